//! Built-in rules and rule list files.

use std::fs;
use std::path::Path;

use claim_model::{GroupType, ValidationRule};

use crate::error::RuleLoadError;

/// Seed rules installed when no rule list is supplied.
pub fn default_rules() -> Vec<ValidationRule> {
    vec![
        ValidationRule::new("1", GroupType::Xml3, "Không có ngày kết quả", "NGAY_KQ == null"),
        ValidationRule::new(
            "1b",
            GroupType::Xml3,
            "Không có ngày kết quả (Full Path)",
            "XML3.NGAY_KQ == null",
        ),
        ValidationRule::new(
            "2",
            GroupType::Xml3,
            "Y lệnh trước khi vào viện",
            "NGAY_YL < XML1.NGAY_VAO",
        )
        .with_field("NGAY_YL"),
    ]
}

/// Parse a JSON array of rules in the rule store's export format.
pub fn parse_rules(json: &str) -> Result<Vec<ValidationRule>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read a rule list file.
pub fn load_rules(path: &Path) -> Result<Vec<ValidationRule>, RuleLoadError> {
    let text = fs::read_to_string(path).map_err(|source| RuleLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rules(&text).map_err(|source| RuleLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim_model::RuleType;

    #[test]
    fn default_rules_are_active_deductions() {
        let rules = default_rules();
        let ids: Vec<_> = rules.iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "1b", "2"]);
        assert!(rules.iter().all(|rule| rule.active));
        assert!(rules.iter().all(|rule| rule.rule_type == RuleType::Deduction));
        assert_eq!(rules[2].field.as_deref(), Some("NGAY_YL"));
    }

    #[test]
    fn parses_exported_rules() {
        let json = r#"[
            {"id": "7", "active": false, "type": "Cảnh báo", "xmlType": "XML2",
             "name": "Thiếu mã thuốc", "code": "MA_THUOC == null",
             "conditionField": "MA_NHOM", "conditionValue": "4,5"}
        ]"#;
        let rules = parse_rules(json).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(!rules[0].active);
        assert_eq!(rules[0].rule_type, RuleType::Warning);
        assert_eq!(rules[0].gate(), Some(("MA_NHOM", "4,5")));
    }
}
