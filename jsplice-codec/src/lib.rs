//! jsplice codec - JSON text to and from the jsplice binary encoding
//!
//! This crate provides the codec surface over the wire primitives in
//! `jsplice-format`:
//!
//! - JSON text to binary encoding (single pass, back-patched container sizes)
//! - Binary to canonical JSON text decoding
//! - Structural validation without decoding
//! - Single-value constructors, predicates, and extractors
//!
//! The JSON-to-binary transform is lexical, not semantic: string escapes are
//! carried byte-for-byte, and the decoder pastes payloads back out without
//! re-escaping. Numbers are the only place text is interpreted, so that a
//! document round-trips to stable bytes from the second conversion onward.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod decode;
pub mod encode;
mod number;
pub mod scalar;
pub mod validate;

// Re-export commonly used types
pub use jsplice_format::{Result, SpliceError, ValueTag};

pub use decode::binary_to_json;
pub use encode::json_to_binary;
pub use scalar::{
    binary_is_double, binary_is_integer, binary_is_string, binary_string_bytes, binary_to_double,
    binary_to_integer, binary_to_string, double_to_binary, integer_to_binary, string_to_binary,
};
pub use validate::binary_validate;
