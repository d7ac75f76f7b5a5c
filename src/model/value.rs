//! Typed filter values and comparison operators carried by property filters.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single typed value of a property filter.
///
/// Mirrors the `valueString` / `valueText` / `valueInt` / `valueBoolean` /
/// `valueNumber` / `valueDate` arguments; exactly one is populated per filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FilterValue {
    String(String),
    Text(String),
    Int(i64),
    Bool(bool),
    Number(f64),
    Date(DateTime<Utc>),
}

impl FilterValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FilterValue::String(_) => "string",
            FilterValue::Text(_) => "text",
            FilterValue::Int(_) => "int",
            FilterValue::Bool(_) => "boolean",
            FilterValue::Number(_) => "number",
            FilterValue::Date(_) => "date",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) | FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FilterValue::Number(f) => Some(*f),
            FilterValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Compare two values. `None` for incompatible types.
    ///
    /// Strings and texts compare with each other; ints and numbers compare
    /// numerically.
    pub fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (FilterValue::Int(a), FilterValue::Int(b)) => Some(a.cmp(b)),
            (FilterValue::Bool(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
            (FilterValue::Date(a), FilterValue::Date(b)) => Some(a.cmp(b)),
            (a, b) if a.as_str().is_some() && b.as_str().is_some() => {
                a.as_str().partial_cmp(&b.as_str())
            }
            (a, b) => a.as_float()?.partial_cmp(&b.as_float()?),
        }
    }
}

impl From<bool> for FilterValue { fn from(v: bool) -> Self { FilterValue::Bool(v) } }
impl From<i32> for FilterValue { fn from(v: i32) -> Self { FilterValue::Int(v as i64) } }
impl From<i64> for FilterValue { fn from(v: i64) -> Self { FilterValue::Int(v) } }
impl From<f64> for FilterValue { fn from(v: f64) -> Self { FilterValue::Number(v) } }
impl From<String> for FilterValue { fn from(v: String) -> Self { FilterValue::String(v) } }
impl From<&str> for FilterValue { fn from(v: &str) -> Self { FilterValue::String(v.to_owned()) } }
impl From<DateTime<Utc>> for FilterValue { fn from(v: DateTime<Utc>) -> Self { FilterValue::Date(v) } }

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::String(s) | FilterValue::Text(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            FilterValue::Int(i) => write!(f, "{i}"),
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Number(v) => write!(f, "{v}"),
            FilterValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Comparison operator of a property filter. Forwarded to the connector as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

impl Operator {
    pub fn from_name(name: &str) -> Option<Operator> {
        match name {
            "Equal" => Some(Operator::Equal),
            "NotEqual" => Some(Operator::NotEqual),
            "LessThan" => Some(Operator::LessThan),
            "LessThanEqual" => Some(Operator::LessThanEqual),
            "GreaterThan" => Some(Operator::GreaterThan),
            "GreaterThanEqual" => Some(Operator::GreaterThanEqual),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanEqual => "LessThanEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanEqual => "GreaterThanEqual",
        }
    }

    /// Apply the operator to `stored.compare(wanted)`.
    pub fn matches(&self, ordering: Option<Ordering>) -> bool {
        let Some(ord) = ordering else { return false };
        match self {
            Operator::Equal => ord == Ordering::Equal,
            Operator::NotEqual => ord != Ordering::Equal,
            Operator::LessThan => ord == Ordering::Less,
            Operator::LessThanEqual => ord != Ordering::Greater,
            Operator::GreaterThan => ord == Ordering::Greater,
            Operator::GreaterThanEqual => ord != Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(FilterValue::from("hello"), FilterValue::String("hello".into()));
        assert_eq!(FilterValue::from(42), FilterValue::Int(42));
        assert_eq!(FilterValue::from(3.5), FilterValue::Number(3.5));
        assert_eq!(FilterValue::from(true), FilterValue::Bool(true));
    }

    #[test]
    fn test_cross_type_comparison() {
        assert_eq!(
            FilterValue::Int(1).compare(&FilterValue::Number(1.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            FilterValue::Text("a".into()).compare(&FilterValue::String("a".into())),
            Some(Ordering::Equal)
        );
        assert_eq!(FilterValue::Bool(true).compare(&FilterValue::Int(1)), None);
    }

    #[test]
    fn test_operator_matches() {
        assert!(Operator::LessThanEqual.matches(Some(Ordering::Equal)));
        assert!(!Operator::GreaterThan.matches(Some(Ordering::Equal)));
        assert!(!Operator::NotEqual.matches(None));
        assert_eq!(Operator::from_name("GreaterThanEqual"), Some(Operator::GreaterThanEqual));
        assert_eq!(Operator::from_name("Like"), None);
    }
}
