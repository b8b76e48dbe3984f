use thiserror::Error;

/// An error raised from inside fixture code.
///
/// `kind_name` stands in for the exception class name the original,
/// reflection-based protocol inspected to decide whether an error should
/// abort the rest of the instruction batch: any kind name containing
/// `stoptest` (case-insensitive) does. `StopTest` is the one variant that
/// satisfies that rule; everything else is an ordinary failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixtureError {
    #[error("{0}")]
    Failed(String),

    #[error("{0}")]
    StopTest(String),
}

impl FixtureError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FixtureError::Failed(_) => "RuntimeError",
            FixtureError::StopTest(_) => "StopTestException",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            FixtureError::Failed(detail) | FixtureError::StopTest(detail) => detail,
        }
    }
}
