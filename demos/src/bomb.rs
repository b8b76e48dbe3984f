use std::sync::Arc;

use slim_fixtures::{ClassDescriptor, FixtureError, FixtureInstance};

/// A fixture whose `explode` method always raises the batch-aborting
/// exception kind, for exercising spec.md §8 scenario 6 ("abort
/// propagation") end to end through a real session.
struct Bomb;

pub fn descriptor() -> ClassDescriptor {
    ClassDescriptor::new("Bomb", Arc::new(|_args| Ok(Box::new(Bomb) as Box<dyn FixtureInstance>)))
        .with_method(
            "explode",
            Arc::new(|_instance, _args| {
                Err(FixtureError::StopTest(
                    "Bomb.explode was invoked".to_string(),
                ))
            }),
        )
}
