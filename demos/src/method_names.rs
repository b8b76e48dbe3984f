use std::sync::Arc;

use slim_codec::SlimValue;
use slim_fixtures::{ClassDescriptor, FixtureInstance};
use slim_values::Value;

/// Two fixtures exercising the method-aliasing rules of spec.md §8
/// testable property 4, grounded directly in `method_names.py`'s
/// `ClassWithPythonicMethodNames` / `ClassWithCamelCaseMethodNames`: a
/// class declaring an underscored method gets all three alias spellings,
/// a class declaring only a camelCase method gets exactly one.
struct Echoer;

fn echo_back(instance: &mut dyn FixtureInstance, args: &[SlimValue]) -> Result<Value, slim_fixtures::FixtureError> {
    let _ = instance.as_any_mut().downcast_mut::<Echoer>().unwrap();
    Ok(Value::Str(
        args.first()
            .and_then(SlimValue::as_str)
            .unwrap_or_default()
            .to_string(),
    ))
}

pub fn pythonic_descriptor() -> ClassDescriptor {
    ClassDescriptor::new(
        "ClassWithPythonicMethodNames",
        Arc::new(|_args| Ok(Box::new(Echoer) as Box<dyn FixtureInstance>)),
    )
    .with_method("a_method", Arc::new(echo_back))
}

pub fn camel_case_descriptor() -> ClassDescriptor {
    ClassDescriptor::new(
        "ClassWithCamelCaseMethodNames",
        Arc::new(|_args| Ok(Box::new(Echoer) as Box<dyn FixtureInstance>)),
    )
    .with_method("aMethod", Arc::new(echo_back))
}
