//! Dotted/bracketed path parsing
//!
//! Grammar, in bytes:
//!
//! ```text
//! path    := '' | segment ('.' field | index)*
//! segment := field | index
//! field   := [^.\[\]]+
//! index   := '[' signed-decimal ']'
//! ```
//!
//! A `[` may follow only a field, a `]`, or the start of input; a `.` must
//! be followed by a field; a `]` may be followed only by `.`, `[`, or the
//! end. Index literals use C `strtol` base-0 semantics: leading whitespace,
//! an optional sign, and `0x`/leading-`0` radix prefixes are accepted, with
//! saturation at the i64 bounds.

use jsplice_format::{Result, SpliceError};

/// One path component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// An object member name
    Field(String),
    /// An array index; negative counts from the end
    Index(i64),
}

/// A parsed path: an ordered sequence of components. Depth zero addresses
/// the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    components: Vec<Component>,
}

/// Parser state: what the previous token was
#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Dot,
    Field,
    Index,
}

impl Path {
    /// Parse a path string
    pub fn parse(input: &str) -> Result<Self> {
        let bytes = input.as_bytes();
        let mut components = Vec::new();
        let mut prev = Prev::Start;
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'[' => {
                    if prev == Prev::Dot {
                        return Err(SpliceError::InvalidPath);
                    }

                    let (value, consumed) = parse_index(&bytes[pos + 1..]);

                    if consumed == 0 {
                        return Err(SpliceError::InvalidPath);
                    }

                    let close = pos + 1 + consumed;

                    if close >= bytes.len() || bytes[close] != b']' {
                        return Err(SpliceError::InvalidPath);
                    }

                    components.push(Component::Index(value));
                    pos = close + 1;
                    prev = Prev::Index;
                }
                b'.' => {
                    if prev != Prev::Field && prev != Prev::Index {
                        return Err(SpliceError::InvalidPath);
                    }

                    pos += 1;
                    prev = Prev::Dot;
                }
                _ => {
                    if prev != Prev::Start && prev != Prev::Dot {
                        return Err(SpliceError::InvalidPath);
                    }

                    let start = pos;

                    while pos < bytes.len() && !matches!(bytes[pos], b'[' | b']' | b'.') {
                        pos += 1;
                    }

                    // A field may stop only at '[', '.', or the end
                    if pos < bytes.len() && bytes[pos] == b']' {
                        return Err(SpliceError::InvalidPath);
                    }

                    let field = std::str::from_utf8(&bytes[start..pos])
                        .map_err(|_| SpliceError::InvalidPath)?;
                    components.push(Component::Field(field.to_owned()));
                    prev = Prev::Field;
                }
            }
        }

        Ok(Path { components })
    }

    /// Number of components; zero is the root
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// Component at position `i`
    pub fn component(&self, i: usize) -> &Component {
        &self.components[i]
    }

    /// The path without its final component
    pub fn parent(&self) -> Path {
        Path {
            components: self.components[..self.components.len() - 1].to_vec(),
        }
    }
}

/// C `strtol(_, _, 0)` over the front of `bytes`: returns the value and the
/// number of bytes consumed, zero when no digits convert
fn parse_index(bytes: &[u8]) -> (i64, usize) {
    let mut pos = 0;

    while pos < bytes.len()
        && matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
    {
        pos += 1;
    }

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let radix: u32;

    if bytes.get(pos) == Some(&b'0')
        && matches!(bytes.get(pos + 1), Some(b'x') | Some(b'X'))
        && bytes
            .get(pos + 2)
            .map(|b| b.is_ascii_hexdigit())
            .unwrap_or(false)
    {
        radix = 16;
        pos += 2;
    } else if bytes.get(pos) == Some(&b'0') {
        radix = 8;
    } else {
        radix = 10;
    }

    let digits_start = pos;
    let mut value: i64 = 0;

    while pos < bytes.len() {
        let digit = match (bytes[pos] as char).to_digit(radix) {
            Some(d) => d as i64,
            None => break,
        };

        value = if negative {
            value
                .checked_mul(radix as i64)
                .and_then(|v| v.checked_sub(digit))
                .unwrap_or(i64::MIN)
        } else {
            value
                .checked_mul(radix as i64)
                .and_then(|v| v.checked_add(digit))
                .unwrap_or(i64::MAX)
        };
        pos += 1;
    }

    if pos == digits_start {
        return (0, 0);
    }

    (value, pos)
}

/// Check a path string for syntactic validity
pub fn validate_path(path: &str) -> Result<()> {
    Path::parse(path).map(|_| ())
}
