use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

/// A typed domain value, as produced by a fixture method return or consumed
/// by a fixture method argument, before it is rendered to (or parsed from)
/// the string-only wire representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No meaningful return value (a method returning `()`), rendered on
    /// the wire as the `/__VOID__/` marker rather than any string.
    Void,
    /// A legitimate null/None return value, rendered as the literal string
    /// `null` — distinct from `Void`, which has no string rendering at all.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Str(String),
    List(Vec<Value>),
    /// Insertion order is preserved so the HTML-table rendering is stable.
    Map(IndexMap<String, Value>),
}

/// The converter dispatch key for a value. Distinct from `Value` itself so
/// that `from_string` conversions (which start from a bare string with no
/// value to inspect) have something to key the registry lookup on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Date,
    Time,
    DateTime,
    Str,
    List,
    Map,
    /// Fallback used for kinds with no registered converter.
    Default,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Default,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }
}
