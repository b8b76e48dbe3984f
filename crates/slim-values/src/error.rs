use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConverterError {
    #[error("'{input}' is not a valid {kind} value")]
    Malformed { kind: &'static str, input: String },

    #[error("no converter is registered for this kind")]
    NoConverterRegistered,

    #[error("this kind has no string-to-value conversion")]
    Unsupported,
}
