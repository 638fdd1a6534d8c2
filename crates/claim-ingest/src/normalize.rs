//! Group normalization: locating the repeated line items of a subfile.
//!
//! Detail subfiles nest their rows inconsistently:
//!
//! ```text
//! CHITIEU_CHITIET_THUOC          wrapper
//! └── DSACH_CHI_TIET_THUOC       list declaration (optional)
//!     └── CHI_TIET_THUOC         rows
//! CHITIEU_DU_LIEU_GIAY_RA_VIEN   wrapper
//! └── GIAY_RA_VIEN               rows, directly under the wrapper
//! ```
//!
//! [`list_items`] is the single source of row positions: validation results
//! and row rendering both index into its output.

use claim_model::{Group, GroupType, XmlNode, XmlValue};

/// Key prefix of the outer list wrapper.
pub const WRAPPER_PREFIX: &str = "CHITIEU_";

/// Key prefix of the optional list declaration inside a wrapper.
pub const DECLARATION_PREFIX: &str = "DSACH_";

/// Key prefix of the row element.
pub const DETAIL_PREFIX: &str = "CHI_TIET";

/// Row element of discharge papers, which does not follow the prefix.
pub const DISCHARGE_DETAIL_TAG: &str = "GIAY_RA_VIEN";

/// Ordered, filtered line items of a group. Empty for the summary type and
/// for groups without a recognizable list.
pub fn list_items(group: &Group) -> Vec<&XmlValue> {
    if group.group_type.is_summary() {
        return Vec::new();
    }
    let Some(node) = group.data.as_node() else {
        return Vec::new();
    };
    locate_rows(node)
        .or_else(|| locate_fixed_rows(&group.group_type, &group.data))
        .map(|rows| retain_rows(rows.as_sequence()))
        .unwrap_or_default()
}

/// Drop blank entries. Positions in the returned vector are row indexes.
pub fn retain_rows(rows: Vec<&XmlValue>) -> Vec<&XmlValue> {
    rows.into_iter().filter(|row| !row.is_blank()).collect()
}

fn locate_rows(node: &XmlNode) -> Option<&XmlValue> {
    for (_, wrapper) in node.iter().filter(|(key, _)| key.starts_with(WRAPPER_PREFIX)) {
        let Some(wrapper) = wrapper.as_node() else {
            continue;
        };

        if let Some((_, declaration)) = wrapper
            .iter()
            .find(|(key, _)| key.starts_with(DECLARATION_PREFIX))
        {
            let detail = declaration.as_node().and_then(|declared| {
                declared
                    .iter()
                    .find(|(key, value)| is_detail_key(key) || matches!(value, XmlValue::List(_)))
            });
            return Some(detail.map_or(declaration, |(_, rows)| rows));
        }

        if let Some((_, rows)) = wrapper.iter().find(|(key, _)| is_detail_key(key)) {
            return Some(rows);
        }
    }
    None
}

fn is_detail_key(key: &str) -> bool {
    key.starts_with(DETAIL_PREFIX) || key == DISCHARGE_DETAIL_TAG
}

fn locate_fixed_rows<'a>(group_type: &GroupType, data: &'a XmlValue) -> Option<&'a XmlValue> {
    fixed_row_paths(group_type)
        .iter()
        .find_map(|path| data.get_path(path))
}

/// Well-known row paths tried when the generic search finds nothing.
fn fixed_row_paths(group_type: &GroupType) -> &'static [&'static [&'static str]] {
    match group_type {
        GroupType::Xml2 => &[&[
            "CHITIEU_CHITIET_THUOC",
            "DSACH_CHI_TIET_THUOC",
            "CHI_TIET_THUOC",
        ]],
        GroupType::Xml3 => &[&[
            "CHITIEU_CHITIET_DVKT_VTYT",
            "DSACH_CHI_TIET_DVKT",
            "CHI_TIET_DVKT",
        ]],
        GroupType::Xml7 => &[
            &["CHITIEU_DU_LIEU_GIAY_RA_VIEN", "GIAY_RA_VIEN"],
            &[
                "CHITIEU_DU_LIEU_GIAY_RA_VIEN",
                "DSACH_GIAY_RA_VIEN",
                "GIAY_RA_VIEN",
            ],
        ],
        _ => &[],
    }
}
