//! Validation engine: applies a compiled rule set to claim records.
//!
//! Rules targeting a list-bearing group type are evaluated once per line
//! item; all other rules are evaluated once per record. Results keep rule
//! order, then item order.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use claim_ingest::list_items;
use claim_model::{ClaimRecord, GroupType, ValidationResult, ValidationRule, XmlValue};

use crate::error::ExpressionError;
use crate::eval::evaluate;
use crate::expr::{Expression, parse_expression};
use crate::rules::default_rules;
use crate::scope::{BaseContext, Scope};

/// Group types whose rules iterate over line items.
pub fn is_list_rule_type(group_type: &GroupType) -> bool {
    matches!(
        group_type,
        GroupType::Xml2 | GroupType::Xml3 | GroupType::Xml4 | GroupType::Xml5
    )
}

/// A rule with its parsed expression.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: ValidationRule,
    expression: Arc<Result<Expression, ExpressionError>>,
}

impl CompiledRule {
    pub fn new(rule: ValidationRule) -> Self {
        let expression = Arc::new(parse_expression(&rule.code));
        Self { rule, expression }
    }

    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }

    /// The parsed expression, or why it could not be parsed.
    pub fn expression(&self) -> Result<&Expression, &ExpressionError> {
        self.expression.as_ref().as_ref()
    }

    fn apply(&self, record: &ClaimRecord, base: &BaseContext<'_>) -> Vec<ValidationResult> {
        let Ok(expression) = self.expression() else {
            return Vec::new();
        };
        let rule = &self.rule;

        if !is_list_rule_type(&rule.xml_type) {
            return if evaluate(expression, &Scope::base(base)) {
                vec![ValidationResult::from_rule(rule, None)]
            } else {
                Vec::new()
            };
        }

        let Some(group) = record.group(&rule.xml_type) else {
            return Vec::new();
        };
        let target = rule.xml_type.as_str();
        list_items(group)
            .into_iter()
            .enumerate()
            .filter(|&(_, item)| passes_gate(rule, item))
            .filter(|&(_, item)| evaluate(expression, &Scope::item(base, target, item)))
            .map(|(index, _)| ValidationResult::from_rule(rule, Some(index)))
            .collect()
    }
}

/// Whether an item passes the rule's condition gate. Rules without a gate
/// accept every item.
fn passes_gate(rule: &ValidationRule, item: &XmlValue) -> bool {
    let Some((field, allowed)) = rule.gate() else {
        return true;
    };
    let value = item
        .get(field)
        .and_then(XmlValue::leaf_text)
        .map(str::trim)
        .unwrap_or_default();
    !value.is_empty() && allowed.split(',').map(str::trim).any(|entry| entry == value)
}

/// Immutable compiled snapshot of a rule list.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    compiled: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(rules: Vec<ValidationRule>) -> Self {
        Self::compile_with(rules, None)
    }

    /// Compile `rules`, reusing parsed expressions from `previous` for rules
    /// whose id and code are unchanged.
    pub fn compile_with(rules: Vec<ValidationRule>, previous: Option<&RuleSet>) -> Self {
        let cache: HashMap<&str, &CompiledRule> = previous
            .map(|set| {
                set.compiled
                    .iter()
                    .map(|compiled| (compiled.rule.id.as_str(), compiled))
                    .collect()
            })
            .unwrap_or_default();

        let compiled = rules
            .into_iter()
            .map(|rule| {
                let cached = cache
                    .get(rule.id.as_str())
                    .filter(|previous| previous.rule.code == rule.code)
                    .map(|previous| Arc::clone(&previous.expression));
                let compiled = match cached {
                    Some(expression) => CompiledRule { rule, expression },
                    None => CompiledRule::new(rule),
                };
                if let Err(error) = compiled.expression() {
                    warn!(rule_id = %compiled.rule.id, %error, "rule expression is malformed and will never match");
                }
                compiled
            })
            .collect();
        Self { compiled }
    }

    pub fn rules(&self) -> impl Iterator<Item = &ValidationRule> {
        self.compiled.iter().map(CompiledRule::rule)
    }

    pub fn compiled(&self) -> &[CompiledRule] {
        &self.compiled
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.rules().filter(|rule| rule.active).count()
    }

    /// Apply every active rule to `record`. Never fails: a malformed rule
    /// contributes no results.
    pub fn validate(&self, record: &ClaimRecord) -> Vec<ValidationResult> {
        let base = BaseContext::new(record);
        let results: Vec<ValidationResult> = self
            .compiled
            .iter()
            .filter(|compiled| compiled.rule.active)
            .flat_map(|compiled| compiled.apply(record, &base))
            .collect();
        debug!(
            rules = self.active_count(),
            results = results.len(),
            "record validated"
        );
        results
    }
}

/// Holds the current rule set. Swapping rules replaces the snapshot; records
/// being validated against the previous snapshot are unaffected.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    rules: Arc<RuleSet>,
}

impl ValidationEngine {
    pub fn new(rules: Vec<ValidationRule>) -> Self {
        Self {
            rules: Arc::new(RuleSet::compile(rules)),
        }
    }

    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    pub fn rule_set(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    pub fn set_rules(&mut self, rules: Vec<ValidationRule>) {
        self.rules = Arc::new(RuleSet::compile_with(rules, Some(&self.rules)));
    }

    pub fn validate(&self, record: &ClaimRecord) -> Vec<ValidationResult> {
        self.rules.validate(record)
    }

    /// Replace the results of every record with a fresh validation.
    pub fn revalidate(&self, records: &mut [ClaimRecord]) {
        for record in records {
            record.validation_results = self.rules.validate(record);
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Compile `rules` and validate one record.
pub fn validate(record: &ClaimRecord, rules: &[ValidationRule]) -> Vec<ValidationResult> {
    RuleSet::compile(rules.to_vec()).validate(record)
}
