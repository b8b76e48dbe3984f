use std::sync::Arc;

use slim_codec::SlimValue;
use slim_fixtures::{ClassDescriptor, FixtureInstance};
use slim_values::Value;

/// Holds a single instance-owned list, starting empty. Each `make` creates
/// a brand new `ListHolder`, so two sessions that each `make` one and
/// `append` to it see a list of length 1, never 2 — the isolation
/// property spec.md §8 scenario 5 asks for, here a direct consequence of
/// Rust ownership rather than anything the fixture does on purpose (see
/// `slim-context`'s `ExecutionContext::make`).
struct ListHolder {
    items: Vec<String>,
}

pub fn descriptor() -> ClassDescriptor {
    ClassDescriptor::new(
        "ListHolder",
        Arc::new(|_args| Ok(Box::new(ListHolder { items: Vec::new() }) as Box<dyn FixtureInstance>)),
    )
    .with_method(
        "append",
        Arc::new(|instance, args| {
            let holder = instance.as_any_mut().downcast_mut::<ListHolder>().unwrap();
            let value = args
                .first()
                .and_then(SlimValue::as_str)
                .unwrap_or_default()
                .to_string();
            holder.items.push(value);
            Ok(Value::Void)
        }),
    )
    .with_method(
        "size",
        Arc::new(|instance, _args| {
            let holder = instance.as_any_mut().downcast_mut::<ListHolder>().unwrap();
            Ok(Value::Int(holder.items.len() as i64))
        }),
    )
}
