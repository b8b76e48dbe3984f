use thiserror::Error;

/// Failures produced while decoding a SLIM wire message.
///
/// Every variant names the byte offset (relative to the start of the slice
/// being parsed) where the parser gave up, so a caller can report a useful
/// diagnostic without re-scanning the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected '[' to open a list at byte offset {offset}")]
    MissingOpenBracket { offset: usize },

    #[error("expected ']' to close a list at byte offset {offset}")]
    MissingCloseBracket { offset: usize },

    #[error("expected a {width}-digit decimal length header at byte offset {offset}")]
    InvalidLengthHeader { offset: usize, width: usize },

    #[error("expected ':' separator at byte offset {offset}")]
    MissingSeparator { offset: usize },

    #[error("item at byte offset {offset} declares length {declared} but only {available} bytes remain")]
    LengthOverrun {
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("payload at byte offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("{0} unconsumed byte(s) remain after the closing ']'")]
    TrailingData(usize),
}
