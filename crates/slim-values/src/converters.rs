use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use slim_codec::SlimValue;

use crate::error::ConverterError;
use crate::registry::ConverterRegistry;
use crate::value::Value;

/// Converts between a typed `Value` and the string-only SLIM wire format.
///
/// Implementations are session-owned (see `ConverterRegistry`), not global
/// statics, so two concurrent sessions can bind different converters for
/// the same kind without affecting each other.
pub trait ValueConverter: Send + Sync {
    /// Renders a value for the wire. Most kinds render to a single string;
    /// `List` renders to a nested `SlimValue::List` by recursively asking
    /// the registry to render each element, mirroring how a SLIM client
    /// expects nested arguments/results to arrive.
    fn to_wire(&self, value: &Value, registry: &ConverterRegistry) -> SlimValue;

    /// Parses a wire string back into a typed value. Kinds with no sensible
    /// single-string representation (`List`) return `Unsupported`.
    fn from_string(&self, input: &str) -> Result<Value, ConverterError>;
}

pub struct StrConverter;
impl ValueConverter for StrConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::Str(s) => SlimValue::str(s.clone()),
            Value::Null => SlimValue::str("null"),
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    /// The literal string `null` (spec.md §4.1: "a nil value is encoded as
    /// the literal string `null`") parses to `Value::Null` rather than the
    /// four-character string, so a fixture that hands a raw argument through
    /// this converter gets the same nil/non-nil distinction back out that it
    /// would get from a real typed argument.
    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        if input == "null" {
            Ok(Value::Null)
        } else {
            Ok(Value::Str(input.to_string()))
        }
    }
}

/// `true`/`false`, the default boolean rendering.
pub struct TrueFalseConverter;
impl ValueConverter for TrueFalseConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        let b = matches!(value, Value::Bool(true));
        SlimValue::str(if b { "true" } else { "false" })
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        Ok(Value::Bool(input.eq_ignore_ascii_case("true")))
    }
}

/// `yes`/`no`, an opt-in alternative boolean rendering (see
/// `converters.py`'s `YesNoConverter` in the original implementation).
pub struct YesNoConverter;
impl ValueConverter for YesNoConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        let b = matches!(value, Value::Bool(true));
        SlimValue::str(if b { "yes" } else { "no" })
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        Ok(Value::Bool(input.eq_ignore_ascii_case("yes")))
    }
}

pub struct IntConverter;
impl ValueConverter for IntConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::Int(i) => SlimValue::str(i.to_string()),
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        input
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ConverterError::Malformed {
                kind: "int",
                input: input.to_string(),
            })
    }
}

pub struct FloatConverter;
impl ValueConverter for FloatConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::Float(f) => SlimValue::str(f.to_string()),
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        input
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ConverterError::Malformed {
                kind: "float",
                input: input.to_string(),
            })
    }
}

/// ISO-ish `YYYY-MM-DD`.
pub struct DateConverter;
impl ValueConverter for DateConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::Date(d) => SlimValue::str(d.format("%Y-%m-%d").to_string()),
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| ConverterError::Malformed {
                kind: "date",
                input: input.to_string(),
            })
    }
}

/// `HH:MM:SS[.ffffff]`.
pub struct TimeConverter;
impl ValueConverter for TimeConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::Time(t) => SlimValue::str(t.format("%H:%M:%S%.f").to_string()),
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        let input = input.trim();
        NaiveTime::parse_from_str(input, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
            .map(Value::Time)
            .map_err(|_| ConverterError::Malformed {
                kind: "time",
                input: input.to_string(),
            })
    }
}

/// `YYYY-MM-DD HH:MM:SS[.ffffff]`.
pub struct DateTimeConverter;
impl ValueConverter for DateTimeConverter {
    fn to_wire(&self, value: &Value, _registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::DateTime(dt) => SlimValue::str(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        let input = input.trim();
        NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S"))
            .map(Value::DateTime)
            .map_err(|_| ConverterError::Malformed {
                kind: "datetime",
                input: input.to_string(),
            })
    }
}

/// Lists/tuples render as a nested nested-list on the wire, each element
/// converted by whichever converter its own kind is bound to. There is no
/// single-string `from_string` for this kind.
pub struct SequenceConverter;
impl ValueConverter for SequenceConverter {
    fn to_wire(&self, value: &Value, registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::List(items) => {
                SlimValue::List(items.iter().map(|item| registry.to_wire(item)).collect())
            }
            other => registry.to_wire(other),
        }
    }

    fn from_string(&self, _input: &str) -> Result<Value, ConverterError> {
        Err(ConverterError::Unsupported)
    }
}

/// Renders/parses a mapping as the `<table><tr><td>k</td><td>v</td></tr>…`
/// markup historically emitted by FitNesse-style dictionary fixtures.
pub struct MappingConverter;
impl ValueConverter for MappingConverter {
    fn to_wire(&self, value: &Value, registry: &ConverterRegistry) -> SlimValue {
        match value {
            Value::Map(entries) => {
                let mut markup = String::from("<table>");
                for (key, val) in entries {
                    let rendered = registry.to_wire(val);
                    let rendered_str = match rendered {
                        SlimValue::Str(s) => s,
                        SlimValue::List(_) => format!("{val:?}"),
                    };
                    markup.push_str("<tr><td>");
                    markup.push_str(key);
                    markup.push_str("</td><td>");
                    markup.push_str(&rendered_str);
                    markup.push_str("</td></tr>");
                }
                markup.push_str("</table>");
                SlimValue::str(markup)
            }
            other => SlimValue::str(format!("{other:?}")),
        }
    }

    fn from_string(&self, input: &str) -> Result<Value, ConverterError> {
        let cells = extract_td_contents(input);
        if cells.len() % 2 != 0 {
            return Err(ConverterError::Malformed {
                kind: "map",
                input: input.to_string(),
            });
        }
        let mut map = indexmap::IndexMap::new();
        for pair in cells.chunks(2) {
            map.insert(pair[0].clone(), Value::Str(pair[1].clone()));
        }
        Ok(Value::Map(map))
    }
}

/// Minimal `<td>...</td>` content extractor. SLIM's mapping markup is
/// produced by this same converter, so it is never arbitrary HTML — a full
/// HTML parser would be solving a problem this format doesn't have.
fn extract_td_contents(markup: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut rest = markup;
    while let Some(start) = rest.find("<td>") {
        let after_open = &rest[start + "<td>".len()..];
        let Some(end) = after_open.find("</td>") else {
            break;
        };
        cells.push(after_open[..end].to_string());
        rest = &after_open[end + "</td>".len()..];
    }
    cells
}
