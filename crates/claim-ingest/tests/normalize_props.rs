//! Property tests for row normalization.

use proptest::prelude::*;

use claim_ingest::list_items;
use claim_model::{Group, GroupType, XmlNode, XmlValue};

fn build_group(rows: &[Option<String>]) -> Group {
    let mut declared = XmlNode::new();
    for row in rows {
        let value = match row {
            Some(code) => XmlValue::Node(XmlNode::new().with("MA_THUOC", code.as_str())),
            None => XmlValue::text(""),
        };
        declared.push("CHI_TIET_THUOC", value);
    }
    let data = XmlNode::new().with(
        "CHITIEU_CHITIET_THUOC",
        XmlNode::new().with("DSACH_CHI_TIET_THUOC", declared),
    );
    Group::new(GroupType::Xml2, XmlValue::Node(data))
}

proptest! {
    #[test]
    fn rows_keep_order_and_skip_blanks(rows in prop::collection::vec(
        prop::option::weighted(0.8, "[A-Z0-9]{1,6}"),
        1..20,
    )) {
        let group = build_group(&rows);
        let items = list_items(&group);
        let expected: Vec<&str> = rows.iter().flatten().map(String::as_str).collect();
        let actual: Vec<&str> = items
            .iter()
            .filter_map(|item| item.get("MA_THUOC").and_then(XmlValue::as_text))
            .collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(list_items(&group).len(), items.len());
    }
}
