//! jsplice transform - path-addressed edits over binary documents
//!
//! A [`Transformer`] owns one encoded document and edits it in place:
//! unset, set (with auto-created intermediate objects), extract, and array
//! prepend/append. No in-memory tree is ever built. Each edit locates the
//! target with a read-only descent that records the byte spans of every
//! enclosing container, then rewrites the buffer in a single backward pass
//! that repairs all the enclosing length prefixes - which may themselves
//! grow or shrink as their varints change width.
//!
//! Paths address sub-values with dotted fields and bracketed indices:
//! `foo.bar[2].baz`, with Python-style negative indices counting from the
//! array's end.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod path;
pub mod transformer;

// Re-export commonly used types
pub use jsplice_format::{Result, SpliceError};

pub use path::{validate_path, Component, Path};
pub use transformer::Transformer;
