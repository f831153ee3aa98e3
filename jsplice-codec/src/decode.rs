//! Binary to JSON text decoding
//!
//! Emits canonical JSON: no whitespace, commas between siblings, a colon
//! after every key. String payloads are pasted between quotes exactly as
//! stored; whatever escapes went in on the encode side come back out.

use jsplice_format::constants::DOUBLE_SIZE;
use jsplice_format::varint::{decode_signed, decode_varint};
use jsplice_format::{Result, SpliceError, ValueTag};

use crate::number::format_double;

/// Decode a binary value into JSON text.
///
/// An empty input decodes to the literal `{}`; this mirrors how an emptied
/// document resets to the empty object.
pub fn binary_to_json(binary: &[u8]) -> Result<String> {
    if binary.is_empty() {
        return Ok("{}".to_owned());
    }

    let mut out = Vec::with_capacity(binary.len() + (binary.len() >> 2));
    let mut pos = 0;

    decode_value(binary, &mut pos, binary.len(), &mut out)?;

    if pos != binary.len() {
        return Err(SpliceError::TrailingData);
    }

    String::from_utf8(out).map_err(|_| SpliceError::NonUtf8)
}

fn decode_value(binary: &[u8], pos: &mut usize, limit: usize, out: &mut Vec<u8>) -> Result<()> {
    if *pos >= limit {
        return Err(SpliceError::UnexpectedEof);
    }

    match ValueTag::from_u8(binary[*pos])? {
        ValueTag::Object => decode_object(binary, pos, limit, out),
        ValueTag::Array => decode_array(binary, pos, limit, out),
        ValueTag::String => decode_string(binary, pos, limit, out),
        ValueTag::Double => decode_double(binary, pos, limit, out),
        ValueTag::Integer => decode_integer(binary, pos, limit, out),
        ValueTag::True => decode_constant(pos, b"true", out),
        ValueTag::False => decode_constant(pos, b"false", out),
        ValueTag::Null => decode_constant(pos, b"null", out),
    }
}

/// Decode the varint length prefix after the tag at `*pos` and bound the
/// body against `limit`, returning (body_start, body_end)
fn decode_body_bounds(binary: &[u8], pos: usize, limit: usize) -> Result<(usize, usize)> {
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

fn decode_object(binary: &[u8], pos: &mut usize, limit: usize, out: &mut Vec<u8>) -> Result<()> {
    let (body_start, body_end) = decode_body_bounds(binary, *pos, limit)?;
    *pos = body_start;

    out.push(b'{');
    let mut first = true;

    while *pos < body_end {
        if !first {
            out.push(b',');
        }

        if binary[*pos] != ValueTag::String as u8 {
            return Err(SpliceError::KeyNotString);
        }

        decode_string(binary, pos, body_end, out)?;
        out.push(b':');
        decode_value(binary, pos, body_end, out)?;
        first = false;
    }

    if *pos != body_end {
        return Err(SpliceError::BodyOverrun);
    }

    out.push(b'}');
    Ok(())
}

fn decode_array(binary: &[u8], pos: &mut usize, limit: usize, out: &mut Vec<u8>) -> Result<()> {
    let (body_start, body_end) = decode_body_bounds(binary, *pos, limit)?;
    *pos = body_start;

    out.push(b'[');
    let mut first = true;

    while *pos < body_end {
        if !first {
            out.push(b',');
        }

        decode_value(binary, pos, body_end, out)?;
        first = false;
    }

    if *pos != body_end {
        return Err(SpliceError::BodyOverrun);
    }

    out.push(b']');
    Ok(())
}

fn decode_string(binary: &[u8], pos: &mut usize, limit: usize, out: &mut Vec<u8>) -> Result<()> {
    if *pos >= limit || binary[*pos] != ValueTag::String as u8 {
        return Err(SpliceError::KeyNotString);
    }

    let (body_start, body_end) = decode_body_bounds(binary, *pos, limit)?;

    out.push(b'"');
    out.extend_from_slice(&binary[body_start..body_end]);
    out.push(b'"');
    *pos = body_end;
    Ok(())
}

fn decode_double(binary: &[u8], pos: &mut usize, limit: usize, out: &mut Vec<u8>) -> Result<()> {
    if *pos + DOUBLE_SIZE > limit {
        return Err(SpliceError::UnexpectedEof);
    }

    let raw: [u8; 8] = binary[*pos + 1..*pos + DOUBLE_SIZE]
        .try_into()
        .map_err(|_| SpliceError::UnexpectedEof)?;
    let value = f64::from_be_bytes(raw);

    out.extend_from_slice(format_double(value).as_bytes());
    *pos += DOUBLE_SIZE;
    Ok(())
}

fn decode_integer(binary: &[u8], pos: &mut usize, limit: usize, out: &mut Vec<u8>) -> Result<()> {
    let (value, used) = decode_signed(&binary[*pos + 1..limit])?;

    out.extend_from_slice(value.to_string().as_bytes());
    *pos += 1 + used;
    Ok(())
}

fn decode_constant(pos: &mut usize, literal: &[u8], out: &mut Vec<u8>) -> Result<()> {
    out.extend_from_slice(literal);
    *pos += 1;
    Ok(())
}
