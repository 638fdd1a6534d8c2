//! Rule evaluation for decoded claim records.
//!
//! Rules are small comparisons (`NGAY_YL < XML1.NGAY_VAO`) parsed once per
//! rule set and evaluated against each record, either once per record or
//! once per line item of the rule's group type.

pub mod engine;
pub mod error;
pub mod eval;
pub mod expr;
pub mod rules;
pub mod scope;

pub use engine::{CompiledRule, RuleSet, ValidationEngine, is_list_rule_type, validate};
pub use error::{ExpressionError, RuleLoadError};
pub use eval::{compare_values, evaluate};
pub use expr::{CompareOp, Expression, Operand, parse_expression};
pub use rules::{default_rules, load_rules, parse_rules};
pub use scope::{BaseContext, ITEM_ALIAS, Scope};
