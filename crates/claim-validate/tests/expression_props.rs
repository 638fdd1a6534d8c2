//! Totality of the expression parser and evaluator.

use proptest::prelude::*;

use claim_model::{ClaimRecord, Group, GroupType, XmlNode, XmlValue};
use claim_validate::{BaseContext, Scope, compare_values, evaluate, parse_expression};

fn record() -> ClaimRecord {
    let summary = XmlNode::new().with(
        "TONG_HOP",
        XmlNode::new()
            .with("MA_LK", "LK01")
            .with("NGAY_VAO", "202301020800"),
    );
    ClaimRecord {
        id: "LK01".to_string(),
        summary: None,
        groups: vec![Group::new(GroupType::Xml1, XmlValue::Node(summary))],
        validation_results: vec![],
        source_file: None,
    }
}

proptest! {
    #[test]
    fn arbitrary_code_never_panics(code in ".{0,40}") {
        let record = record();
        let base = BaseContext::new(&record);
        let item = XmlValue::Node(XmlNode::new().with("NGAY_YL", "202301010800"));
        let scope = Scope::item(&base, "XML3", &item);
        if let Ok(expression) = parse_expression(&code) {
            let _ = evaluate(&expression, &scope);
            let _ = evaluate(&expression, &Scope::base(&base));
        }
    }

    #[test]
    fn operator_shaped_code_never_panics(
        left in "[A-Za-z0-9_.'\" ]{0,12}",
        op in prop::sample::select(vec!["<", "<=", ">", ">=", "==", "!=", "===", "!==", "="]),
        right in "[A-Za-z0-9_.'\" ]{0,12}",
    ) {
        let record = record();
        let base = BaseContext::new(&record);
        let code = format!("{left}{op}{right}");
        if let Ok(expression) = parse_expression(&code) {
            let _ = evaluate(&expression, &Scope::base(&base));
        }
    }

    #[test]
    fn comparison_is_antisymmetric(left in "[0-9a-z. ]{0,8}", right in "[0-9a-z. ]{0,8}") {
        prop_assert_eq!(compare_values(&left, &right), compare_values(&right, &left).reverse());
    }

    #[test]
    fn short_digit_strings_order_as_integers(left in 0u64..10_000_000, right in 0u64..10_000_000) {
        prop_assert_eq!(
            compare_values(&left.to_string(), &right.to_string()),
            left.cmp(&right)
        );
    }

    #[test]
    fn equal_width_digit_strings_order_as_integers(
        left in "[0-9]{20}",
        right in "[0-9]{20}",
    ) {
        let expected = left.parse::<u128>().ok().cmp(&right.parse::<u128>().ok());
        prop_assert_eq!(compare_values(&left, &right), expected);
    }
}
