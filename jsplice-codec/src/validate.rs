//! Structural validation without decoding
//!
//! The decoder's descent with the output elided: every declared span must
//! match its contents exactly and the walk must consume the whole buffer.

use jsplice_format::constants::DOUBLE_SIZE;
use jsplice_format::varint::decode_varint;
use jsplice_format::{Result, SpliceError, ValueTag};

/// Check that `binary` holds exactly one well-formed value.
///
/// The empty buffer validates; it decodes to `{}`.
pub fn binary_validate(binary: &[u8]) -> Result<()> {
    if binary.is_empty() {
        return Ok(());
    }

    let mut pos = 0;
    validate_value(binary, &mut pos, binary.len())?;

    if pos != binary.len() {
        return Err(SpliceError::TrailingData);
    }

    Ok(())
}

fn validate_value(binary: &[u8], pos: &mut usize, limit: usize) -> Result<()> {
    if *pos >= limit {
        return Err(SpliceError::UnexpectedEof);
    }

    match ValueTag::from_u8(binary[*pos])? {
        ValueTag::Object => validate_object(binary, pos, limit),
        ValueTag::Array => validate_array(binary, pos, limit),
        ValueTag::String => validate_string(binary, pos, limit),
        ValueTag::Double => {
            if *pos + DOUBLE_SIZE > limit {
                return Err(SpliceError::UnexpectedEof);
            }
            *pos += DOUBLE_SIZE;
            Ok(())
        }
        ValueTag::Integer => {
            let (_, used) = decode_varint(&binary[*pos + 1..limit])?;
            *pos += 1 + used;
            Ok(())
        }
        ValueTag::True | ValueTag::False | ValueTag::Null => {
            *pos += 1;
            Ok(())
        }
    }
}

fn body_bounds(binary: &[u8], pos: usize, limit: usize) -> Result<(usize, usize)> {
    let (size, used) = decode_varint(&binary[pos + 1..limit])?;
    let body_start = pos + 1 + used;
    let body_end = body_start
        .checked_add(size as usize)
        .ok_or(SpliceError::BodyOverrun)?;

    if body_end > limit {
        return Err(SpliceError::BodyOverrun);
    }

    Ok((body_start, body_end))
}

fn validate_object(binary: &[u8], pos: &mut usize, limit: usize) -> Result<()> {
    let (body_start, body_end) = body_bounds(binary, *pos, limit)?;
    *pos = body_start;

    while *pos < body_end {
        if binary[*pos] != ValueTag::String as u8 {
            return Err(SpliceError::KeyNotString);
        }
        validate_string(binary, pos, body_end)?;
        validate_value(binary, pos, body_end)?;
    }

    if *pos != body_end {
        return Err(SpliceError::BodyOverrun);
    }

    Ok(())
}

fn validate_array(binary: &[u8], pos: &mut usize, limit: usize) -> Result<()> {
    let (body_start, body_end) = body_bounds(binary, *pos, limit)?;
    *pos = body_start;

    while *pos < body_end {
        validate_value(binary, pos, body_end)?;
    }

    if *pos != body_end {
        return Err(SpliceError::BodyOverrun);
    }

    Ok(())
}

fn validate_string(binary: &[u8], pos: &mut usize, limit: usize) -> Result<()> {
    if *pos >= limit || binary[*pos] != ValueTag::String as u8 {
        return Err(SpliceError::KeyNotString);
    }

    let (_, body_end) = body_bounds(binary, *pos, limit)?;
    *pos = body_end;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::json_to_binary;
    use jsplice_format::constants::{TAG_ARRAY, TAG_INTEGER, TAG_OBJECT, TAG_STRING, TAG_TRUE};

    #[test]
    fn test_encoded_documents_validate() {
        for json in [
            "{}",
            "[]",
            "true",
            "null",
            "5",
            "-5",
            "3.14",
            "\"hello\"",
            r#"{"a":{"b":[1,2.5,"x",true,false,null]}}"#,
        ] {
            let binary = json_to_binary(json).unwrap();
            assert!(binary_validate(&binary).is_ok(), "validate {}", json);
        }
    }

    #[test]
    fn test_empty_buffer_validates() {
        assert!(binary_validate(&[]).is_ok());
    }

    #[test]
    fn test_constants_advance() {
        let binary = vec![TAG_ARRAY, 1, TAG_TRUE];
        assert!(binary_validate(&binary).is_ok());
    }

    #[test]
    fn test_rejects_bad_lengths() {
        // Body length overruns the buffer
        assert!(binary_validate(&[TAG_OBJECT, 5]).is_err());
        // Body length stops mid-child
        assert!(binary_validate(&[TAG_ARRAY, 1, TAG_INTEGER, 1]).is_err());
        // Key is not a string
        assert!(binary_validate(&[TAG_OBJECT, 2, TAG_TRUE, TAG_TRUE]).is_err());
        // String payload truncated
        assert!(binary_validate(&[TAG_STRING, 3, b'a']).is_err());
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        assert!(binary_validate(&[TAG_TRUE, TAG_TRUE]).is_err());
    }

    #[test]
    fn test_rejects_unknown_tag() {
        assert!(binary_validate(&[0x3f]).is_err());
    }
}
