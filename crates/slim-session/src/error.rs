use thiserror::Error;

/// A fatal-for-this-session failure (spec.md §7 tier 3): wire framing
/// errors, malformed headers, or I/O failures. The session that raised one
/// of these is torn down; the server process and every other session
/// continue unaffected.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed length header: {0}")]
    InvalidHeader(String),

    #[error("decode error: {0}")]
    Decode(#[from] slim_codec::CodecError),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}
