//! Error types for the jsplice format

use thiserror::Error;

/// jsplice error types
#[derive(Debug, Error)]
pub enum SpliceError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("truncated varint")]
    TruncatedVarint,
    #[error("varint continues past the 10-byte maximum")]
    VarintTooLong,
    #[error("unknown tag byte {0:#04x}")]
    UnknownTag(u8),
    #[error("container body overruns its bounds")]
    BodyOverrun,
    #[error("object key is not a string")]
    KeyNotString,
    #[error("trailing data after the top-level value")]
    TrailingData,
    #[error("unexpected character at byte {0}")]
    UnexpectedCharacter(usize),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("truncated escape sequence")]
    TruncatedEscape,
    #[error("number does not parse")]
    BadNumber,
    #[error("string payload is not valid UTF-8")]
    NonUtf8,
    #[error("invalid path syntax")]
    InvalidPath,
    #[error("path does not resolve to a value")]
    PathNotFound,
    #[error("path component does not match the container kind")]
    TypeMismatch,
    #[error("value is not an array")]
    NotAnArray,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SpliceError>;
