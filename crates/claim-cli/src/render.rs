//! Display formatting for claim field values.

use chrono::{NaiveDate, NaiveDateTime};

use claim_model::{CDATA_KEY, XmlValue};

/// Column names rendered as dates.
const DATE_MARKERS: [&str; 2] = ["NGAY", "THOI_GIAN"];

/// Columns shown first, in this order, when present.
const PRIORITY_COLUMNS: [&str; 8] = [
    "MA_LK",
    "NGAY_YL",
    "NGAY_TH_YL",
    "NGAY_KQ",
    "MA_DICH_VU",
    "TEN_DICH_VU",
    "MA_THUOC",
    "TEN_THUOC",
];

/// Row counter column carried by the source files; replaced by the index.
const ROW_NUMBER_COLUMN: &str = "STT";

/// Plain display text of a value. Subtrees render empty.
pub fn render_value(value: Option<&XmlValue>) -> String {
    value
        .and_then(XmlValue::leaf_text)
        .unwrap_or_default()
        .to_string()
}

/// Render `yyyymmddHHMM[ss]` as `dd/mm/yyyy HH:MM` and `yyyymmdd` as
/// `dd/mm/yyyy`. Anything else is returned unchanged.
pub fn format_date_time(text: &str) -> String {
    let digits = text.trim();
    if digits.len() < 8 || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return text.to_string();
    }
    if digits.len() >= 12
        && let Ok(moment) = NaiveDateTime::parse_from_str(&digits[..12], "%Y%m%d%H%M")
    {
        return moment.format("%d/%m/%Y %H:%M").to_string();
    }
    match NaiveDate::parse_from_str(&digits[..8], "%Y%m%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => text.to_string(),
    }
}

pub fn is_date_column(column: &str) -> bool {
    DATE_MARKERS.iter().any(|marker| column.contains(marker))
}

/// Display text of one cell.
pub fn render_cell(column: &str, value: Option<&XmlValue>) -> String {
    let text = render_value(value);
    if is_date_column(column) {
        format_date_time(&text)
    } else {
        text
    }
}

/// Union of field names over `items`, in first-seen order with the
/// priority columns moved to the front.
pub fn row_columns(items: &[&XmlValue]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for node in items.iter().filter_map(|item| item.as_node()) {
        for key in node.keys() {
            let hidden = key == CDATA_KEY || key.starts_with('_') || key == ROW_NUMBER_COLUMN;
            if !hidden && !columns.iter().any(|existing| existing == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns.sort_by_key(|column| {
        PRIORITY_COLUMNS
            .iter()
            .position(|priority| priority == column)
            .unwrap_or(PRIORITY_COLUMNS.len())
    });
    columns
}
