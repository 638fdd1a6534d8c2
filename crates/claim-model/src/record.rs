use serde::{Deserialize, Serialize};

use crate::group::{Group, GroupType};
use crate::node::XmlValue;
use crate::rule::ValidationResult;

/// Field of the summary that carries the claim key.
pub const CLAIM_KEY_FIELD: &str = "MA_LK";

/// One claim decoded from an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: String,
    /// Unwrapped whole-record summary, when the envelope carries one.
    pub summary: Option<XmlValue>,
    pub groups: Vec<Group>,
    #[serde(default)]
    pub validation_results: Vec<ValidationResult>,
    /// Envelope file the record came from, set by batch ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ClaimRecord {
    /// First group of the given type.
    pub fn group(&self, group_type: &GroupType) -> Option<&Group> {
        self.groups
            .iter()
            .find(|group| &group.group_type == group_type)
    }

    /// Trimmed, non-empty leaf value of a summary field.
    pub fn summary_field(&self, field: &str) -> Option<&str> {
        self.summary
            .as_ref()?
            .as_node()?
            .get(field)?
            .leaf_text()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn error_count(&self) -> usize {
        self.validation_results
            .iter()
            .filter(|result| result.is_error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.validation_results
            .iter()
            .filter(|result| !result.is_error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
