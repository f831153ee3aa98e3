//! Tag bytes and fixed literals for the jsplice encoding

/// Object: varint body length, then (string key, value) pairs
pub const TAG_OBJECT: u8 = 0x40;
/// Array: varint body length, then values
pub const TAG_ARRAY: u8 = 0x41;
/// String: varint byte length, then raw payload bytes
pub const TAG_STRING: u8 = 0x42;
/// Double: 8 bytes, big-endian IEEE-754
pub const TAG_DOUBLE: u8 = 0x43;
/// Integer: varint of the i64 two's-complement bit pattern
pub const TAG_INTEGER: u8 = 0x44;
/// Boolean true, no payload
pub const TAG_TRUE: u8 = 0x45;
/// Boolean false, no payload
pub const TAG_FALSE: u8 = 0x46;
/// Null, no payload
pub const TAG_NULL: u8 = 0x47;

/// The encoded empty object, also the reset state of an emptied document
pub const EMPTY_OBJECT: [u8; 2] = [TAG_OBJECT, 0x00];

/// Size in bytes of an encoded double (tag plus IEEE-754 payload)
pub const DOUBLE_SIZE: usize = 9;
