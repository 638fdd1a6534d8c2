//! Error types for rule parsing and loading.

use std::path::PathBuf;
use thiserror::Error;

/// A rule's `code` is not a supported comparison. Such rules never match.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("no comparison operator in '{code}'")]
    NoOperator { code: String },

    #[error("missing operand on the {side} of '{operator}'")]
    EmptyOperand {
        side: &'static str,
        operator: &'static str,
    },

    #[error("invalid operand '{operand}'")]
    InvalidOperand { operand: String },
}

/// Failure to read a rule list file.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    #[error("failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
