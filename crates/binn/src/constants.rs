//! binn type tags.
//!
//! The high three bits of a tag select the storage class (no payload,
//! byte, word, dword, qword, string, container); the low five bits are
//! the subtype.

pub const NULL: u8 = 0x00;
pub const TRUE: u8 = 0x01;
pub const FALSE: u8 = 0x02;

pub const UINT8: u8 = 0x20;
pub const INT8: u8 = 0x21;

pub const UINT16: u8 = 0x40;
pub const INT16: u8 = 0x41;

pub const UINT32: u8 = 0x60;
pub const INT32: u8 = 0x61;
pub const FLOAT32: u8 = 0x62;

pub const UINT64: u8 = 0x80;
pub const INT64: u8 = 0x81;
pub const FLOAT64: u8 = 0x82;

pub const STRING: u8 = 0xa0;

pub const LIST: u8 = 0xe0;
pub const MAP: u8 = 0xe1;
pub const OBJECT: u8 = 0xe2;

/// Size and count fields at or above this value take four bytes.
pub const SIZE_WIDE: u32 = 0x80;

/// Largest representable size/count (four-byte field, top bit reserved).
pub const SIZE_MAX: u32 = 0x7fff_ffff;
