use std::sync::Arc;

use slim_codec::SlimValue;
use slim_fixtures::{ClassDescriptor, FixtureInstance};
use slim_values::{StrConverter, Value, ValueConverter};

/// Echoes its argument back, unchanged — the simplest possible fixture,
/// used for scenario S1 ("echo round trip") in spec.md §8 and as the
/// reference point for the variable-substitution examples above it.
///
/// The argument is run through `StrConverter::from_string` rather than
/// wrapped directly in `Value::Str`, so a caller that echoes the literal
/// string `null` gets back a real `Value::Null` (spec.md §4.1) instead of
/// the four-character string — still rendered as `null` on the wire either
/// way, but now distinguishable on the fixture side from an empty string.
struct Echo;

pub fn descriptor() -> ClassDescriptor {
    ClassDescriptor::new("Echo", Arc::new(|_args| Ok(Box::new(Echo) as Box<dyn FixtureInstance>)))
        .with_method(
            "echo",
            Arc::new(|_instance, args| {
                let raw = args.first().and_then(SlimValue::as_str).unwrap_or_default();
                StrConverter
                    .from_string(raw)
                    .map_err(|e| slim_fixtures::FixtureError::Failed(e.to_string()))
            }),
        )
}
