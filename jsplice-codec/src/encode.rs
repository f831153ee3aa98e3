//! JSON text to binary encoding
//!
//! A single linear pass over the input. Containers are sized by
//! back-patching: children are emitted first, then the body is shifted
//! right by the width of the tag and length varint. Strings are copied
//! byte-for-byte between the quotes; escape sequences are carried through
//! without being decoded.

use jsplice_format::constants::{
    TAG_ARRAY, TAG_DOUBLE, TAG_FALSE, TAG_INTEGER, TAG_NULL, TAG_OBJECT, TAG_STRING, TAG_TRUE,
};
use jsplice_format::varint::encode_varint;
use jsplice_format::{Result, SpliceError};

use crate::number;

/// Encode one JSON text into a binary value.
///
/// Leading and trailing ASCII whitespace is permitted; anything else
/// around the single top-level value is an error, as is empty input.
pub fn json_to_binary(json: &str) -> Result<Vec<u8>> {
    let input = json.as_bytes();

    if input.is_empty() {
        return Err(SpliceError::UnexpectedEof);
    }

    let mut out = Vec::with_capacity(input.len());
    let mut pos = 0;

    skip_whitespace(input, &mut pos);
    encode_value(input, &mut pos, &mut out)?;
    skip_whitespace(input, &mut pos);

    if pos != input.len() {
        return Err(SpliceError::TrailingData);
    }

    Ok(out)
}

fn skip_whitespace(input: &[u8], pos: &mut usize) {
    while *pos < input.len() && input[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
}

fn encode_value(input: &[u8], pos: &mut usize, out: &mut Vec<u8>) -> Result<()> {
    skip_whitespace(input, pos);

    if *pos >= input.len() {
        return Err(SpliceError::UnexpectedEof);
    }

    match input[*pos] {
        b'{' => encode_object(input, pos, out),
        b'[' => encode_array(input, pos, out),
        b'"' => encode_string(input, pos, out),
        b'+' | b'-' | b'.' | b'0'..=b'9' | b'e' | b'E' => encode_number(input, pos, out),
        b't' => encode_keyword(input, pos, b"true", TAG_TRUE, out),
        b'f' => encode_keyword(input, pos, b"false", TAG_FALSE, out),
        b'n' => encode_keyword(input, pos, b"null", TAG_NULL, out),
        _ => Err(SpliceError::UnexpectedCharacter(*pos)),
    }
}

/// Shift the body emitted since `start` right and write the tag and length
/// varint in front of it
fn close_container(tag: u8, start: usize, out: &mut Vec<u8>) {
    let body = (out.len() - start) as u64;
    let varint = encode_varint(body);
    let mut header = Vec::with_capacity(1 + varint.len());
    header.push(tag);
    header.extend_from_slice(&varint);
    out.splice(start..start, header);
}

fn encode_object(input: &[u8], pos: &mut usize, out: &mut Vec<u8>) -> Result<()> {
    *pos += 1; // consume '{'
    let start = out.len();
    let mut first = true;

    while *pos < input.len() {
        skip_whitespace(input, pos);

        if *pos < input.len() && input[*pos] == b'}' {
            *pos += 1;
            close_container(TAG_OBJECT, start, out);
            return Ok(());
        }

        if !first {
            if *pos >= input.len() || input[*pos] != b',' {
                return Err(SpliceError::UnexpectedCharacter(*pos));
            }
            *pos += 1;
        }

        first = false;
        skip_whitespace(input, pos);

        if *pos >= input.len() || input[*pos] != b'"' {
            return Err(SpliceError::UnexpectedCharacter(*pos));
        }

        encode_string(input, pos, out)?;
        skip_whitespace(input, pos);

        if *pos >= input.len() || input[*pos] != b':' {
            return Err(SpliceError::UnexpectedCharacter(*pos));
        }

        *pos += 1;
        skip_whitespace(input, pos);
        encode_value(input, pos, out)?;
    }

    Err(SpliceError::UnexpectedEof)
}

fn encode_array(input: &[u8], pos: &mut usize, out: &mut Vec<u8>) -> Result<()> {
    *pos += 1; // consume '['
    let start = out.len();
    let mut first = true;

    while *pos < input.len() {
        skip_whitespace(input, pos);

        if *pos < input.len() && input[*pos] == b']' {
            *pos += 1;
            close_container(TAG_ARRAY, start, out);
            return Ok(());
        }

        if !first {
            if *pos >= input.len() || input[*pos] != b',' {
                return Err(SpliceError::UnexpectedCharacter(*pos));
            }
            *pos += 1;
        }

        first = false;
        skip_whitespace(input, pos);
        encode_value(input, pos, out)?;
    }

    Err(SpliceError::UnexpectedEof)
}

fn encode_string(input: &[u8], pos: &mut usize, out: &mut Vec<u8>) -> Result<()> {
    *pos += 1; // consume opening '"'
    let start = *pos;

    while *pos < input.len() {
        match input[*pos] {
            b'\\' => {
                if *pos + 1 >= input.len() {
                    return Err(SpliceError::UnterminatedString);
                }
                if input[*pos + 1] == b'u' {
                    // \uXXXX plus at least the closing quote after it
                    if *pos + 6 >= input.len() {
                        return Err(SpliceError::TruncatedEscape);
                    }
                    *pos += 6;
                } else {
                    *pos += 2;
                }
            }
            b'"' => break,
            _ => *pos += 1,
        }
    }

    if *pos >= input.len() {
        return Err(SpliceError::UnterminatedString);
    }

    let payload = &input[start..*pos];
    out.push(TAG_STRING);
    out.extend_from_slice(&encode_varint(payload.len() as u64));
    out.extend_from_slice(payload);
    *pos += 1; // consume closing '"'
    Ok(())
}

fn encode_number(input: &[u8], pos: &mut usize, out: &mut Vec<u8>) -> Result<()> {
    let start = *pos;
    let mut double = false;

    while *pos < input.len() {
        match input[*pos] {
            b'.' | b'e' | b'E' => {
                double = true;
                *pos += 1;
            }
            b'0'..=b'9' | b'+' | b'-' => *pos += 1,
            _ => break,
        }
    }

    let run = &input[start..*pos];

    if double {
        let value = number::parse_double(run)?;
        out.push(TAG_DOUBLE);
        out.extend_from_slice(&value.to_be_bytes());
    } else {
        let value = number::parse_integer(run)?;
        out.push(TAG_INTEGER);
        out.extend_from_slice(&encode_varint(value as u64));
    }

    Ok(())
}

fn encode_keyword(
    input: &[u8],
    pos: &mut usize,
    keyword: &[u8],
    tag: u8,
    out: &mut Vec<u8>,
) -> Result<()> {
    if *pos + keyword.len() > input.len() || &input[*pos..*pos + keyword.len()] != keyword {
        return Err(SpliceError::UnexpectedCharacter(*pos));
    }

    out.push(tag);
    *pos += keyword.len();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsplice_format::constants::EMPTY_OBJECT;

    #[test]
    fn test_empty_object() {
        assert_eq!(json_to_binary("{}").unwrap(), EMPTY_OBJECT.to_vec());
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(json_to_binary("[]").unwrap(), vec![TAG_ARRAY, 0x00]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(json_to_binary("true").unwrap(), vec![TAG_TRUE]);
        assert_eq!(json_to_binary("false").unwrap(), vec![TAG_FALSE]);
        assert_eq!(json_to_binary("null").unwrap(), vec![TAG_NULL]);
    }

    #[test]
    fn test_string_payload_is_verbatim() {
        let binary = json_to_binary(r#""a\nb""#).unwrap();
        assert_eq!(binary, vec![TAG_STRING, 4, b'a', b'\\', b'n', b'b']);
    }

    #[test]
    fn test_unicode_escape_is_verbatim() {
        let binary = json_to_binary("\"\\u0041\"").unwrap();
        assert_eq!(
            binary,
            vec![TAG_STRING, 6, b'\\', b'u', b'0', b'0', b'4', b'1']
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        let binary = json_to_binary(r#""a\"b""#).unwrap();
        assert_eq!(binary, vec![TAG_STRING, 4, b'a', b'\\', b'"', b'b']);
    }

    #[test]
    fn test_integer_encoding() {
        assert_eq!(json_to_binary("5").unwrap(), vec![TAG_INTEGER, 5]);
        assert_eq!(json_to_binary("128").unwrap(), vec![TAG_INTEGER, 0x80, 0x01]);
        // -1 reinterprets to u64::MAX: ten varint bytes
        assert_eq!(json_to_binary("-1").unwrap().len(), 11);
    }

    #[test]
    fn test_double_encoding() {
        let binary = json_to_binary("3.14").unwrap();
        assert_eq!(binary.len(), 9);
        assert_eq!(binary[0], TAG_DOUBLE);
        assert_eq!(f64::from_be_bytes(binary[1..9].try_into().unwrap()), 3.14);
    }

    #[test]
    fn test_number_classification() {
        assert_eq!(json_to_binary("5").unwrap()[0], TAG_INTEGER);
        assert_eq!(json_to_binary("5.0").unwrap()[0], TAG_DOUBLE);
        assert_eq!(json_to_binary("5e0").unwrap()[0], TAG_DOUBLE);
        assert_eq!(json_to_binary(".5").unwrap()[0], TAG_DOUBLE);
    }

    #[test]
    fn test_nested_document() {
        let binary = json_to_binary(r#"{"a":[1,true],"b":null}"#).unwrap();
        let expected = vec![
            TAG_OBJECT, 12, // body
            TAG_STRING, 1, b'a', TAG_ARRAY, 3, TAG_INTEGER, 1, TAG_TRUE, TAG_STRING, 1, b'b',
            TAG_NULL,
        ];
        assert_eq!(binary, expected);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let compact = json_to_binary(r#"{"a":1}"#).unwrap();
        let spaced = json_to_binary(" { \"a\" :\n\t1 } ").unwrap();
        assert_eq!(compact, spaced);
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(json_to_binary("").is_err());
        assert!(json_to_binary("banana").is_err());
        assert!(json_to_binary("   ").is_err());
    }

    #[test]
    fn test_rejects_trailing_data() {
        assert!(json_to_binary("{} {}").is_err());
        assert!(json_to_binary("5,").is_err());
    }

    #[test]
    fn test_rejects_unterminated() {
        assert!(json_to_binary("{\"a\":1").is_err());
        assert!(json_to_binary("[1,2").is_err());
        assert!(json_to_binary("\"abc").is_err());
        assert!(json_to_binary("\"ab\\").is_err());
        assert!(json_to_binary("\"ab\\u00").is_err());
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        assert!(json_to_binary("1+2").is_err());
        assert!(json_to_binary("-").is_err());
        assert!(json_to_binary("1.2.3").is_err());
        assert!(json_to_binary("e").is_err());
    }

    #[test]
    fn test_rejects_trailing_comma() {
        assert!(json_to_binary("{\"a\":1,}").is_err());
        assert!(json_to_binary("[1,]").is_err());
    }

    #[test]
    fn test_integer_saturation() {
        let binary = json_to_binary("99999999999999999999").unwrap();
        assert_eq!(binary[0], TAG_INTEGER);
        let (value, _) = jsplice_format::varint::decode_varint(&binary[1..]).unwrap();
        assert_eq!(value as i64, i64::MAX);
    }
}
