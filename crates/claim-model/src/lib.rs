pub mod error;
pub mod group;
pub mod node;
pub mod record;
pub mod rule;

pub use error::{ModelError, Result};
pub use group::{Group, GroupType};
pub use node::{ATTRIBUTE_PREFIX, CDATA_KEY, TEXT_KEY, XmlNode, XmlValue};
pub use record::{CLAIM_KEY_FIELD, ClaimRecord};
pub use rule::{RuleType, ValidationResult, ValidationRule};

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_results(results: Vec<ValidationResult>) -> ClaimRecord {
        ClaimRecord {
            id: "LK01".to_string(),
            summary: Some(XmlValue::Node(XmlNode::new().with("MA_LK", " LK01 "))),
            groups: vec![],
            validation_results: results,
            source_file: None,
        }
    }

    #[test]
    fn record_counts() {
        let error = ValidationRule::new("1", GroupType::Xml3, "e", "A == null");
        let warning = error.clone().with_type(RuleType::Warning);
        let record = record_with_results(vec![
            ValidationResult::from_rule(&error, Some(0)),
            ValidationResult::from_rule(&error, Some(2)),
            ValidationResult::from_rule(&warning, None),
        ]);
        assert_eq!(record.error_count(), 2);
        assert_eq!(record.warning_count(), 1);
        assert!(record.has_errors());
        assert_eq!(record.summary_field(CLAIM_KEY_FIELD), Some("LK01"));
    }

    #[test]
    fn record_serializes_camel_case() {
        let rule = ValidationRule::new("1", GroupType::Xml1, "e", "A == null");
        let record = record_with_results(vec![ValidationResult::from_rule(&rule, None)]);
        let json = serde_json::to_value(&record).expect("serialize record");
        assert!(json.get("validationResults").is_some());
        assert!(json.get("sourceFile").is_none());
        let first = &json["validationResults"][0];
        assert_eq!(first["ruleId"], "1");
        assert_eq!(first["type"], "Xuất toán");
        assert!(first.get("index").is_none());
        let round: ClaimRecord = serde_json::from_value(json).expect("deserialize record");
        assert_eq!(round, record);
    }
}
