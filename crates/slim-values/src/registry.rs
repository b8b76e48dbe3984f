use std::collections::HashMap;

use slim_codec::SlimValue;

use crate::converters::{
    DateConverter, DateTimeConverter, FloatConverter, IntConverter, MappingConverter,
    SequenceConverter, StrConverter, TimeConverter, TrueFalseConverter, ValueConverter,
};
use crate::error::ConverterError;
use crate::value::{Value, ValueKind};

/// A session-owned registry of `ValueKind -> ValueConverter` bindings.
///
/// Each `ExecutionContext` owns one of these, so two concurrent sessions can
/// rebind a kind (e.g. swap `TrueFalseConverter` for `YesNoConverter`)
/// without affecting each other. This replaces the thread-local scoping of
/// the converter registry the protocol was originally modeled on — Tokio
/// connections are not OS threads, so only an owned field gives the right
/// isolation here.
pub struct ConverterRegistry {
    converters: HashMap<ValueKind, Box<dyn ValueConverter>>,
}

impl ConverterRegistry {
    pub fn with_defaults() -> Self {
        let mut converters: HashMap<ValueKind, Box<dyn ValueConverter>> = HashMap::new();
        converters.insert(ValueKind::Bool, Box::new(TrueFalseConverter));
        converters.insert(ValueKind::Int, Box::new(IntConverter));
        converters.insert(ValueKind::Float, Box::new(FloatConverter));
        converters.insert(ValueKind::Date, Box::new(DateConverter));
        converters.insert(ValueKind::Time, Box::new(TimeConverter));
        converters.insert(ValueKind::DateTime, Box::new(DateTimeConverter));
        converters.insert(ValueKind::Str, Box::new(StrConverter));
        converters.insert(ValueKind::List, Box::new(SequenceConverter));
        converters.insert(ValueKind::Map, Box::new(MappingConverter));
        converters.insert(ValueKind::Default, Box::new(StrConverter));
        Self { converters }
    }

    /// Replaces the converter bound to `kind`, e.g. registering
    /// `YesNoConverter` in place of the default `TrueFalseConverter`.
    pub fn register(&mut self, kind: ValueKind, converter: Box<dyn ValueConverter>) {
        self.converters.insert(kind, converter);
    }

    /// Renders a value to its wire form using the converter bound to the
    /// value's own kind, falling back to the default (string) converter.
    pub fn to_wire(&self, value: &Value) -> SlimValue {
        if matches!(value, Value::Null) {
            return SlimValue::str("null");
        }
        let kind = value.kind();
        match self.converters.get(&kind) {
            Some(converter) => converter.to_wire(value, self),
            None => self.default_converter().to_wire(value, self),
        }
    }

    /// Parses a wire string into a typed value using the converter bound
    /// to `kind`.
    pub fn from_string(&self, kind: ValueKind, input: &str) -> Result<Value, ConverterError> {
        self.converters
            .get(&kind)
            .ok_or(ConverterError::NoConverterRegistered)?
            .from_string(input)
    }

    fn default_converter(&self) -> &dyn ValueConverter {
        self.converters
            .get(&ValueKind::Default)
            .expect("default converter is always registered")
            .as_ref()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_registries_can_diverge_independently() {
        let mut session_a = ConverterRegistry::with_defaults();
        let session_b = ConverterRegistry::with_defaults();

        session_a.register(ValueKind::Bool, Box::new(crate::converters::YesNoConverter));

        assert_eq!(
            session_a.to_wire(&Value::Bool(true)),
            SlimValue::str("yes")
        );
        assert_eq!(
            session_b.to_wire(&Value::Bool(true)),
            SlimValue::str("true")
        );
    }

    #[test]
    fn int_round_trips() {
        let registry = ConverterRegistry::with_defaults();
        let wire = registry.to_wire(&Value::Int(42));
        assert_eq!(wire, SlimValue::str("42"));
        let parsed = registry.from_string(ValueKind::Int, "42").unwrap();
        assert_eq!(parsed, Value::Int(42));
    }

    #[test]
    fn null_always_renders_as_literal_null() {
        let registry = ConverterRegistry::with_defaults();
        assert_eq!(registry.to_wire(&Value::Null), SlimValue::str("null"));
    }
}
