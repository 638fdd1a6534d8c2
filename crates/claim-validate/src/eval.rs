//! Expression evaluation against a [`Scope`].

use std::cmp::Ordering;

use claim_model::XmlValue;

use crate::expr::{CompareOp, Expression, Operand};
use crate::scope::Scope;

/// An operand after resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolved<'v> {
    Missing,
    Leaf(&'v str),
    Subtree,
}

/// Evaluate a parsed expression. Missing data never satisfies a general
/// comparison.
pub fn evaluate(expression: &Expression, scope: &Scope<'_, '_>) -> bool {
    match expression {
        Expression::NullCheck { operand, negated } => {
            let is_null = match resolve_operand(operand, scope) {
                Resolved::Missing => true,
                Resolved::Leaf(text) => text.is_empty(),
                Resolved::Subtree => false,
            };
            is_null != *negated
        }
        Expression::Compare { left, op, right } => {
            let (Resolved::Leaf(left), Resolved::Leaf(right)) =
                (resolve_operand(left, scope), resolve_operand(right, scope))
            else {
                return false;
            };
            apply(*op, compare_values(left, right))
        }
    }
}

fn resolve_operand<'v>(operand: &'v Operand, scope: &Scope<'_, 'v>) -> Resolved<'v> {
    match operand {
        Operand::Null => Resolved::Missing,
        Operand::Literal(text) => Resolved::Leaf(text),
        Operand::Path(path) => match scope.resolve(path) {
            Some(value) => classify(value),
            None if parse_number(path).is_some() => Resolved::Leaf(path),
            None => Resolved::Missing,
        },
    }
}

fn classify(value: &XmlValue) -> Resolved<'_> {
    match value.leaf_text() {
        Some(text) => Resolved::Leaf(text),
        None => Resolved::Subtree,
    }
}

/// Digit strings at least this long are dates or date-times.
const DATE_LIKE_DIGITS: usize = 8;

/// Order two leaf values. After trimming:
///
/// - two date-like digit strings are right-padded with zeros to the same
///   length and compared digit by digit, so `20230102` is midnight of that
///   day and sorts after `202301010800`
/// - two other digit strings compare as exact integers
/// - two finite decimal numbers compare numerically
///
/// Anything else compares the raw strings lexically.
pub fn compare_values(left: &str, right: &str) -> Ordering {
    let (trimmed_left, trimmed_right) = (left.trim(), right.trim());
    if is_digits(trimmed_left) && is_digits(trimmed_right) {
        let date_like = trimmed_left.len().min(trimmed_right.len()) >= DATE_LIKE_DIGITS;
        return if date_like {
            compare_padded(trimmed_left, trimmed_right)
        } else {
            compare_integers(trimmed_left, trimmed_right)
        };
    }
    match (parse_number(left), parse_number(right)) {
        (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        _ => left.cmp(right),
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

fn compare_padded(left: &str, right: &str) -> Ordering {
    let width = left.len().max(right.len());
    pad_digits(left, width).cmp(pad_digits(right, width))
}

fn pad_digits(digits: &str, width: usize) -> impl Iterator<Item = u8> + '_ {
    digits.bytes().chain(std::iter::repeat(b'0')).take(width)
}

fn compare_integers(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn apply(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Eq | CompareOp::StrictEq => ordering == Ordering::Equal,
        CompareOp::Ne | CompareOp::StrictNe => ordering != Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expression;
    use crate::scope::BaseContext;
    use claim_model::{ClaimRecord, Group, GroupType, XmlNode};

    fn record(summary: XmlNode) -> ClaimRecord {
        ClaimRecord {
            id: "LK01".to_string(),
            summary: None,
            groups: vec![Group::new(
                GroupType::Xml1,
                XmlValue::Node(XmlNode::new().with("TONG_HOP", summary)),
            )],
            validation_results: vec![],
            source_file: None,
        }
    }

    fn eval_item(code: &str, item: XmlNode) -> bool {
        let record = record(XmlNode::new().with("NGAY_VAO", "202301020800"));
        let base = BaseContext::new(&record);
        let item = XmlValue::Node(item);
        let scope = Scope::item(&base, "XML3", &item);
        evaluate(&parse_expression(code).unwrap(), &scope)
    }

    #[test]
    fn null_check_treats_missing_and_empty_as_null() {
        assert!(eval_item("NGAY_KQ == null", XmlNode::new()));
        assert!(eval_item("NGAY_KQ == null", XmlNode::new().with("NGAY_KQ", "")));
        assert!(!eval_item("NGAY_KQ == null", XmlNode::new().with("NGAY_KQ", "0")));
        assert!(!eval_item("NGAY_KQ == null", XmlNode::new().with("NGAY_KQ", "202301010900")));
        assert!(eval_item("NGAY_KQ != null", XmlNode::new().with("NGAY_KQ", "0")));
        assert!(!eval_item("NGAY_KQ !== undefined", XmlNode::new()));
    }

    #[test]
    fn subtrees_are_not_null_and_never_compare() {
        let item = XmlNode::new().with("NESTED", XmlNode::new().with("A", "1"));
        assert!(!eval_item("NESTED == null", item.clone()));
        assert!(!eval_item("NESTED == NESTED", item.clone()));
        assert!(!eval_item("NESTED != 1", item));
    }

    #[test]
    fn dates_compare_chronologically() {
        let item = XmlNode::new().with("NGAY_YL", "202301010800");
        assert!(eval_item("NGAY_YL < XML1.NGAY_VAO", item.clone()));
        assert!(!eval_item("NGAY_YL >= XML1.NGAY_VAO", item));
    }

    #[test]
    fn dates_of_different_precision_are_zero_padded() {
        assert_eq!(compare_values("202301010800", "20230102"), Ordering::Less);
        assert_eq!(compare_values("20230102", "202301010800"), Ordering::Greater);
        assert_eq!(compare_values("20230102", "202301020000"), Ordering::Equal);
        assert_eq!(compare_values("202301020800", "20230102080030"), Ordering::Less);
        assert_eq!(compare_values("20230102080100", "202301020800"), Ordering::Greater);
        assert_eq!(compare_values("202301020800", "20230102080000"), Ordering::Equal);

        let record = record(XmlNode::new().with("NGAY_VAO", "20230102"));
        let base = BaseContext::new(&record);
        let item = XmlValue::Node(XmlNode::new().with("NGAY_YL", "202301010800"));
        let scope = Scope::item(&base, "XML3", &item);
        let early = parse_expression("NGAY_YL < XML1.NGAY_VAO").unwrap();
        assert!(evaluate(&early, &scope));
    }

    #[test]
    fn long_digit_strings_compare_exactly() {
        assert_eq!(
            compare_values("12345678901234567890", "12345678901234567891"),
            Ordering::Less
        );
        assert_eq!(compare_values("0012", "12"), Ordering::Equal);
        assert_eq!(compare_values("0", "000"), Ordering::Equal);
        assert_eq!(compare_values("1234567", "999"), Ordering::Greater);
        assert!(eval_item(
            "MA_THE != '12345678901234567891'",
            XmlNode::new().with("MA_THE", "12345678901234567890")
        ));
    }

    #[test]
    fn missing_side_is_false_for_every_operator() {
        for code in ["A < B", "A > B", "A <= B", "A >= B", "A == B", "A != B"] {
            assert!(!eval_item(code, XmlNode::new().with("A", "1")), "{code}");
        }
    }

    #[test]
    fn numeric_paths_fall_back_to_literals() {
        assert!(eval_item("SO_LUONG > 0", XmlNode::new().with("SO_LUONG", "2.5")));
        assert!(!eval_item("SO_LUONG > 0", XmlNode::new().with("SO_LUONG", "0")));
        assert!(eval_item("SO_LUONG == 1", XmlNode::new().with("SO_LUONG", " 1.0 ")));
    }

    #[test]
    fn strict_and_loose_equality_agree() {
        let item = XmlNode::new().with("MA_NHOM", "10");
        assert!(eval_item("MA_NHOM == '10'", item.clone()));
        assert!(eval_item("MA_NHOM === 10", item.clone()));
        assert!(eval_item("MA_NHOM == 10.0", item.clone()));
        assert!(!eval_item("MA_NHOM !== '10'", item));
    }

    #[test]
    fn cdata_leaves_are_unwrapped() {
        let leaf = XmlNode::new().with("@_lang", "vi").with("__cdata", "abc");
        let item = XmlNode::new().with("GHI_CHU", leaf);
        assert!(eval_item("GHI_CHU == 'abc'", item.clone()));
        assert!(!eval_item("GHI_CHU == null", item));
    }

    #[test]
    fn mixed_values_compare_lexically() {
        assert_eq!(compare_values("abc", "abd"), Ordering::Less);
        assert_eq!(compare_values("10", "9"), Ordering::Greater);
        assert_eq!(compare_values("10", "9a"), Ordering::Less);
        assert_eq!(compare_values(" 7 ", "7"), Ordering::Equal);
        assert_eq!(compare_values("inf", "1"), Ordering::Greater);
    }
}
