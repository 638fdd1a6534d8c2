//! Validation rules and the results they produce.

use serde::{Deserialize, Serialize};

use crate::group::GroupType;

/// Rule classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// Deduction-class: the matched amount is refused, a hard error.
    #[serde(rename = "Xuất toán", alias = "error", alias = "deduction")]
    Deduction,
    /// Soft warning.
    #[serde(rename = "Cảnh báo", alias = "warning")]
    Warning,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Deduction => "Xuất toán",
            RuleType::Warning => "Cảnh báo",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RuleType::Deduction)
    }
}

fn default_active() -> bool {
    true
}

/// A user-configured rule, read as a snapshot from the rule store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub id: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub xml_type: GroupType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comparison expression, e.g. `NGAY_YL < XML1.NGAY_VAO`.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_field: Option<String>,
    /// Comma-separated allow-list for `condition_field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ValidationRule {
    /// Active deduction-class rule with no gate or message override.
    pub fn new(
        id: impl Into<String>,
        xml_type: GroupType,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            active: true,
            rule_type: RuleType::Deduction,
            xml_type,
            field: None,
            name: name.into(),
            description: None,
            code: code.into(),
            condition_field: None,
            condition_value: None,
            error_message: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = rule_type;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, field: impl Into<String>, values: impl Into<String>) -> Self {
        self.condition_field = Some(field.into());
        self.condition_value = Some(values.into());
        self
    }

    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Gate field and raw allow-list, when both are non-blank.
    pub fn gate(&self) -> Option<(&str, &str)> {
        let field = self.condition_field.as_deref().map(str::trim)?;
        let values = self.condition_value.as_deref()?;
        if field.is_empty() || values.trim().is_empty() {
            return None;
        }
        Some((field, values))
    }

    /// Message shown for a match: the override when non-empty, else the name.
    pub fn message(&self) -> &str {
        match self.error_message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => &self.name,
        }
    }
}

/// One rule match on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub rule_id: String,
    pub rule_name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub xml_type: GroupType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    pub is_error: bool,
    /// Position in the group's normalized item list; absent for
    /// whole-record rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ValidationResult {
    pub fn from_rule(rule: &ValidationRule, index: Option<usize>) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            rule_type: rule.rule_type,
            xml_type: rule.xml_type.clone(),
            field: rule.field.clone(),
            message: rule.message().to_string(),
            is_error: rule.rule_type.is_error(),
            index,
        }
    }
}
