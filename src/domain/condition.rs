//! Best-effort extraction of literal comparisons from condition strings.
//!
//! Recognizes `input.<name> <op> <literal>` where the literal is an unsigned
//! integer, an unsigned decimal, or a single/double quoted string. Anything
//! the scanner does not understand is skipped; there is no error path.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::domain::entities::InputValue;

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"input\.(\w+)\s*([<>=!]+)\s*(\d+\.\d+|\d+|'[^']*'|"[^"]*")"#)
        .expect("comparison pattern compiles")
});

/// Comparison operator as written in the condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    /// Any other run of `<>=!` characters, kept verbatim
    Unrecognized(String),
}

/// Which side of the literal a satisfying value lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Above,
    Below,
    Exact,
}

impl Operator {
    pub fn parse(s: &str) -> Self {
        match s {
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "==" => Operator::Eq,
            "!=" => Operator::Ne,
            other => Operator::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Unrecognized(s) => s,
        }
    }

    /// Direction is decided by the spelling: anything containing `>` points
    /// above, anything else containing `<` points below.
    pub fn bound(&self) -> Bound {
        let s = self.as_str();
        if s.contains('>') {
            Bound::Above
        } else if s.contains('<') {
            Bound::Below
        } else {
            Bound::Exact
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    fn coerce(raw: &str) -> Option<Self> {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse().ok().map(Literal::Integer);
        }
        if let Some((int, frac)) = raw.split_once('.') {
            let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
            if digits(int) && digits(frac) {
                return raw.parse().ok().map(Literal::Float);
            }
        }
        let quoted = raw.len() >= 2
            && ((raw.starts_with('\'') && raw.ends_with('\''))
                || (raw.starts_with('"') && raw.ends_with('"')));
        if quoted {
            return Some(Literal::Text(raw[1..raw.len() - 1].to_string()));
        }
        None
    }

    /// Shift a numeric literal by `delta`; strings come back unchanged.
    pub fn offset(&self, delta: i64) -> InputValue {
        match self {
            Literal::Integer(i) => InputValue::Integer(i.saturating_add(delta)),
            Literal::Float(x) => InputValue::Float(x + delta as f64),
            Literal::Text(s) => InputValue::Text(s.clone()),
        }
    }
}

impl From<&Literal> for InputValue {
    fn from(literal: &Literal) -> Self {
        literal.offset(0)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// One `variable operator literal` comparison found in a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionTriple {
    pub variable: String,
    pub operator: Operator,
    pub literal: Literal,
}

impl fmt::Display for ConditionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.operator, self.literal)
    }
}

/// Scan a condition for literal comparisons against `input.<name>`.
///
/// `None` and the empty string yield no triples.
pub fn parse_condition(condition: Option<&str>) -> Vec<ConditionTriple> {
    let Some(condition) = condition.filter(|c| !c.is_empty()) else {
        return Vec::new();
    };

    COMPARISON
        .captures_iter(condition)
        .filter_map(|caps| {
            let raw = &caps[3];
            let Some(literal) = Literal::coerce(raw) else {
                trace!("skipping unparsable literal {:?} in {:?}", raw, condition);
                return None;
            };
            Some(ConditionTriple {
                variable: caps[1].to_string(),
                operator: Operator::parse(&caps[2]),
                literal,
            })
        })
        .collect()
}
