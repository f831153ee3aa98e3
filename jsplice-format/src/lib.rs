//! jsplice format - wire-level primitives for the jsplice binary encoding
//!
//! This crate provides the fundamental building blocks of the format with no
//! higher-level dependencies:
//!
//! - Tag byte constants for the eight value kinds
//! - Variable-length integer encoding (base-128, little-endian)
//! - Error types
//!
//! The encoding represents one JSON-equivalent value as a tagged,
//! self-delimited byte sequence. Objects, arrays, and strings carry a varint
//! byte-length of their body; doubles are 8 bytes big-endian; integers are
//! the varint of their two's-complement bit pattern; `true`, `false`, and
//! `null` are a bare tag byte.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod types;
pub mod varint;

// Re-export commonly used types
pub use error::{Result, SpliceError};
pub use types::ValueTag;
