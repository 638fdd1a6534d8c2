//! Rule expression language.
//!
//! A rule's `code` is a single comparison `<left> <op> <right>`:
//!
//! ```text
//! NGAY_KQ == null
//! XML3.NGAY_YL < XML1.NGAY_VAO
//! SO_LUONG > 0
//! MA_NHOM != '10'
//! ```
//!
//! The split point is chosen by scanning for operators in a fixed priority
//! order (`<=`, `>=`, `==`, `!=`, `===`, `!==`, `<`, `>`); the first
//! occurrence of the first operator found wins. Two-character operators are
//! therefore never split into `<`/`>` plus a stray `=`.

use std::fmt;

use crate::error::ExpressionError;

/// Target name of the dead assignment syntax `DK_LOI = <expr>`.
pub const LEGACY_ASSIGNMENT_TARGET: &str = "DK_LOI";

const OPERATOR_PRIORITY: [&str; 8] = ["<=", ">=", "==", "!=", "===", "!==", "<", ">"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
}

impl CompareOp {
    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "<" => CompareOp::Lt,
            "<=" => CompareOp::Le,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::Ge,
            "==" => CompareOp::Eq,
            "!=" => CompareOp::Ne,
            "===" => CompareOp::StrictEq,
            "!==" => CompareOp::StrictNe,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::StrictEq => "===",
            CompareOp::StrictNe => "!==",
        }
    }

    /// `==`, `===`, `!=` or `!==`.
    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            CompareOp::Eq | CompareOp::StrictEq | CompareOp::Ne | CompareOp::StrictNe
        )
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, CompareOp::Ne | CompareOp::StrictNe)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `null` or `undefined`.
    Null,
    /// Quoted string.
    Literal(String),
    /// Field path, e.g. `XML1.NGAY_VAO`. Bare numbers are paths that fall
    /// back to numeric literals when nothing resolves.
    Path(String),
}

impl Operand {
    fn parse(text: &str) -> Result<Self, ExpressionError> {
        if matches!(text, "null" | "undefined") {
            return Ok(Operand::Null);
        }
        if let Some(inner) = unquote(text) {
            return Ok(Operand::Literal(inner.to_string()));
        }
        let valid = !text.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"')
            && text.split('.').all(|segment| !segment.is_empty());
        if valid {
            Ok(Operand::Path(text.to_string()))
        } else {
            Err(ExpressionError::InvalidOperand {
                operand: text.to_string(),
            })
        }
    }
}

fn unquote(text: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|quote| {
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}

/// Parsed rule condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// `<operand> == null` (or `!=` when negated): missing, null or empty.
    NullCheck { operand: Operand, negated: bool },
    Compare {
        left: Operand,
        op: CompareOp,
        right: Operand,
    },
}

/// Parse a rule's `code`.
pub fn parse_expression(code: &str) -> Result<Expression, ExpressionError> {
    let code = strip_legacy_marker(code).trim();
    if code.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let (start, token) = find_operator(code).ok_or_else(|| ExpressionError::NoOperator {
        code: code.to_string(),
    })?;
    let left_text = code[..start].trim();
    let right_text = code[start + token.len()..].trim();
    if left_text.is_empty() || right_text.is_empty() {
        return Err(ExpressionError::EmptyOperand {
            side: if left_text.is_empty() { "left" } else { "right" },
            operator: token,
        });
    }

    let op = CompareOp::from_token(token).ok_or_else(|| ExpressionError::NoOperator {
        code: code.to_string(),
    })?;
    let left = Operand::parse(left_text)?;
    let right = Operand::parse(right_text)?;

    if right == Operand::Null && op.is_equality() {
        return Ok(Expression::NullCheck {
            operand: left,
            negated: op.is_negated(),
        });
    }
    Ok(Expression::Compare { left, op, right })
}

/// Strip a leading `DK_LOI =` assignment. Comparisons such as
/// `DK_LOI == x` or `DK_LOI <= x` are left untouched.
pub fn strip_legacy_marker(code: &str) -> &str {
    let trimmed = code.trim();
    if !trimmed.starts_with(LEGACY_ASSIGNMENT_TARGET) {
        return code;
    }
    let Some(position) = trimmed.find('=') else {
        return code;
    };
    let bytes = trimmed.as_bytes();
    let joined_after = bytes.get(position + 1) == Some(&b'=');
    let joined_before = position > 0 && matches!(bytes[position - 1], b'<' | b'>' | b'!');
    if joined_after || joined_before {
        return code;
    }
    trimmed[position + 1..].trim_start()
}

fn find_operator(code: &str) -> Option<(usize, &'static str)> {
    OPERATOR_PRIORITY.iter().find_map(|&token| {
        code.find(token)
            .map(|start| widen_operator(code.as_bytes(), start, token))
    })
}

/// `==`/`!=` found inside `===`/`!==` are widened to the strict form.
fn widen_operator(bytes: &[u8], start: usize, token: &'static str) -> (usize, &'static str) {
    let followed_by_eq = bytes.get(start + token.len()) == Some(&b'=');
    match token {
        "==" if start > 0 && bytes[start - 1] == b'!' => (start - 1, "!=="),
        "==" if followed_by_eq => (start, "==="),
        "!=" if followed_by_eq => (start, "!=="),
        _ => (start, token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> Operand {
        Operand::Path(text.to_string())
    }

    #[test]
    fn two_char_operators_are_not_split() {
        let expr = parse_expression("A <= B").unwrap();
        assert_eq!(
            expr,
            Expression::Compare {
                left: path("A"),
                op: CompareOp::Le,
                right: path("B"),
            }
        );
        let expr = parse_expression("A>=B").unwrap();
        assert!(matches!(expr, Expression::Compare { op: CompareOp::Ge, .. }));
    }

    #[test]
    fn strict_operators_are_recognized() {
        let expr = parse_expression("A === B").unwrap();
        assert!(matches!(expr, Expression::Compare { op: CompareOp::StrictEq, .. }));
        let expr = parse_expression("A !== B").unwrap();
        assert_eq!(
            expr,
            Expression::Compare {
                left: path("A"),
                op: CompareOp::StrictNe,
                right: path("B"),
            }
        );
    }

    #[test]
    fn priority_picks_first_listed_operator() {
        let err = parse_expression("A < B <= C").unwrap_err();
        assert_eq!(
            err,
            ExpressionError::InvalidOperand {
                operand: "A < B".to_string()
            }
        );
    }

    #[test]
    fn null_right_side_is_a_null_check() {
        assert_eq!(
            parse_expression("NGAY_KQ == null").unwrap(),
            Expression::NullCheck {
                operand: path("NGAY_KQ"),
                negated: false,
            }
        );
        assert_eq!(
            parse_expression("XML3.NGAY_KQ !== undefined").unwrap(),
            Expression::NullCheck {
                operand: path("XML3.NGAY_KQ"),
                negated: true,
            }
        );
        assert!(matches!(
            parse_expression("A < null").unwrap(),
            Expression::Compare { right: Operand::Null, .. }
        ));
    }

    #[test]
    fn literals_are_parsed() {
        assert_eq!(
            parse_expression("MA_NHOM == '10'").unwrap(),
            Expression::Compare {
                left: path("MA_NHOM"),
                op: CompareOp::Eq,
                right: Operand::Literal("10".to_string()),
            }
        );
        assert!(matches!(
            parse_expression("SO_LUONG > 0").unwrap(),
            Expression::Compare { right: Operand::Path(_), .. }
        ));
    }

    #[test]
    fn legacy_assignment_is_stripped() {
        assert_eq!(strip_legacy_marker("DK_LOI = A == null"), "A == null");
        assert_eq!(strip_legacy_marker("  DK_LOI=A < B"), "A < B");
        assert_eq!(strip_legacy_marker("DK_LOI == 1"), "DK_LOI == 1");
        assert_eq!(strip_legacy_marker("DK_LOI <= 1"), "DK_LOI <= 1");
        assert_eq!(strip_legacy_marker("DK_LOI >= 1"), "DK_LOI >= 1");
        assert_eq!(strip_legacy_marker("DK_LOI != 1"), "DK_LOI != 1");
        assert_eq!(strip_legacy_marker("X = 1"), "X = 1");
        assert_eq!(
            parse_expression("DK_LOI >= 1").unwrap(),
            Expression::Compare {
                left: path("DK_LOI"),
                op: CompareOp::Ge,
                right: path("1"),
            }
        );
        assert_eq!(
            parse_expression("DK_LOI = NGAY_KQ == null").unwrap(),
            parse_expression("NGAY_KQ == null").unwrap()
        );
    }

    #[test]
    fn malformed_expressions_are_errors() {
        assert_eq!(parse_expression("   "), Err(ExpressionError::Empty));
        assert!(matches!(
            parse_expression("A = B"),
            Err(ExpressionError::NoOperator { .. })
        ));
        assert!(matches!(
            parse_expression("== null"),
            Err(ExpressionError::EmptyOperand { side: "left", .. })
        ));
        assert!(matches!(
            parse_expression("A.. == 1"),
            Err(ExpressionError::InvalidOperand { .. })
        ));
        assert!(matches!(
            parse_expression("A == 'x"),
            Err(ExpressionError::InvalidOperand { .. })
        ));
    }
}
