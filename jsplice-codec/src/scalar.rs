//! Single-value constructors, predicates, and extractors
//!
//! Each predicate requires the buffer to hold exactly one value of the
//! named kind, with nothing before or after it. The extractors assert the
//! matching predicate; callers check first.

use jsplice_format::constants::{DOUBLE_SIZE, TAG_DOUBLE, TAG_INTEGER, TAG_STRING};
use jsplice_format::varint::{decode_varint, encode_signed, encode_varint, varint_length};

/// Encode raw bytes as a standalone string value
pub fn string_to_binary(string: &[u8]) -> Vec<u8> {
    let mut binary = Vec::with_capacity(1 + varint_length(string.len() as u64) + string.len());
    binary.push(TAG_STRING);
    binary.extend_from_slice(&encode_varint(string.len() as u64));
    binary.extend_from_slice(string);
    binary
}

/// Encode an i64 as a standalone integer value
pub fn integer_to_binary(number: i64) -> Vec<u8> {
    let mut binary = Vec::with_capacity(1 + varint_length(number as u64));
    binary.push(TAG_INTEGER);
    binary.extend_from_slice(&encode_signed(number));
    binary
}

/// Encode an f64 as a standalone double value
pub fn double_to_binary(number: f64) -> Vec<u8> {
    let mut binary = Vec::with_capacity(DOUBLE_SIZE);
    binary.push(TAG_DOUBLE);
    binary.extend_from_slice(&number.to_be_bytes());
    binary
}

/// True if `binary` is exactly one string value
pub fn binary_is_string(binary: &[u8]) -> bool {
    if binary.first() != Some(&TAG_STRING) {
        return false;
    }

    match decode_varint(&binary[1..]) {
        Ok((size, used)) => (1 + used).checked_add(size as usize) == Some(binary.len()),
        Err(_) => false,
    }
}

/// True if `binary` is exactly one integer value
pub fn binary_is_integer(binary: &[u8]) -> bool {
    if binary.first() != Some(&TAG_INTEGER) {
        return false;
    }

    match decode_varint(&binary[1..]) {
        Ok((_, used)) => 1 + used == binary.len(),
        Err(_) => false,
    }
}

/// True if `binary` is exactly one double value
pub fn binary_is_double(binary: &[u8]) -> bool {
    binary.len() == DOUBLE_SIZE && binary[0] == TAG_DOUBLE
}

/// Payload length of a standalone string value, in bytes.
///
/// # Panics
///
/// Panics unless [`binary_is_string`] holds.
pub fn binary_string_bytes(binary: &[u8]) -> usize {
    assert!(binary_is_string(binary));
    let (size, _) = decode_varint(&binary[1..]).expect("checked by binary_is_string");
    size as usize
}

/// Payload bytes of a standalone string value.
///
/// # Panics
///
/// Panics unless [`binary_is_string`] holds.
pub fn binary_to_string(binary: &[u8]) -> &[u8] {
    assert!(binary_is_string(binary));
    let (_, used) = decode_varint(&binary[1..]).expect("checked by binary_is_string");
    &binary[1 + used..]
}

/// Value of a standalone integer value.
///
/// # Panics
///
/// Panics unless [`binary_is_integer`] holds.
pub fn binary_to_integer(binary: &[u8]) -> i64 {
    assert!(binary_is_integer(binary));
    let (unum, _) = decode_varint(&binary[1..]).expect("checked by binary_is_integer");
    unum as i64
}

/// Value of a standalone double value.
///
/// # Panics
///
/// Panics unless [`binary_is_double`] holds.
pub fn binary_to_double(binary: &[u8]) -> f64 {
    assert!(binary_is_double(binary));
    let raw: [u8; 8] = binary[1..DOUBLE_SIZE]
        .try_into()
        .expect("checked by binary_is_double");
    f64::from_be_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        let binary = string_to_binary(b"hello");
        assert_eq!(binary, vec![TAG_STRING, 5, b'h', b'e', b'l', b'l', b'o']);
        assert!(binary_is_string(&binary));
        assert!(!binary_is_integer(&binary));
        assert!(!binary_is_double(&binary));
        assert_eq!(binary_string_bytes(&binary), 5);
        assert_eq!(binary_to_string(&binary), b"hello");
    }

    #[test]
    fn test_empty_string() {
        let binary = string_to_binary(b"");
        assert!(binary_is_string(&binary));
        assert_eq!(binary_string_bytes(&binary), 0);
        assert_eq!(binary_to_string(&binary), b"");
    }

    #[test]
    fn test_string_payload_may_be_arbitrary_bytes() {
        let payload = [0x00, 0xff, 0x40, 0x42];
        let binary = string_to_binary(&payload);
        assert!(binary_is_string(&binary));
        assert_eq!(binary_to_string(&binary), &payload);
    }

    #[test]
    fn test_integer_round_trip() {
        for value in [0, 1, -1, 127, 128, i64::MIN, i64::MAX] {
            let binary = integer_to_binary(value);
            assert!(binary_is_integer(&binary), "is_integer({})", value);
            assert_eq!(binary_to_integer(&binary), value);
        }
    }

    #[test]
    fn test_negative_integer_width() {
        // Two's-complement reinterpretation: tag plus ten varint bytes
        assert_eq!(integer_to_binary(-1).len(), 11);
    }

    #[test]
    fn test_double_round_trip() {
        for value in [0.0, -0.0, 3.14, -2.5e300, f64::INFINITY] {
            let binary = double_to_binary(value);
            assert_eq!(binary.len(), DOUBLE_SIZE);
            assert!(binary_is_double(&binary));
            assert_eq!(binary_to_double(&binary).to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_predicates_reject_wrong_spans() {
        // Trailing byte after a complete value
        let mut binary = string_to_binary(b"x");
        binary.push(0);
        assert!(!binary_is_string(&binary));

        let mut binary = integer_to_binary(7);
        binary.push(0);
        assert!(!binary_is_integer(&binary));

        // Truncated double
        assert!(!binary_is_double(&[TAG_DOUBLE, 0, 0]));

        // Empty buffer is nothing
        assert!(!binary_is_string(&[]));
        assert!(!binary_is_integer(&[]));
        assert!(!binary_is_double(&[]));
    }
}
