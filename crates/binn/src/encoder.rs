//! binn encoder: smallest-width scalar encoders and bottom-up container
//! builders.
//!
//! Containers are assembled from already-encoded member bytes, so the
//! total-size header is known when the container is finished and nothing
//! is ever backfilled.

use crate::constants::*;
use crate::error::BinnError;

/// Writes a variable-width size/count field.
fn write_size(out: &mut Vec<u8>, n: u32) {
    if n < SIZE_WIDE {
        out.push(n as u8);
    } else {
        out.extend_from_slice(&(n | 0x8000_0000).to_be_bytes());
    }
}

/// Bytes a size/count field occupies for `n`.
fn size_field_len(n: u32) -> usize {
    if n < SIZE_WIDE {
        1
    } else {
        4
    }
}

pub fn encode_null() -> Vec<u8> {
    vec![NULL]
}

pub fn encode_bool(b: bool) -> Vec<u8> {
    vec![if b { TRUE } else { FALSE }]
}

/// Encodes an integer at the smallest width that holds it. Non-negative
/// values prefer the unsigned tags.
pub fn encode_i64(v: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    if v >= 0 {
        if v <= u8::MAX as i64 {
            out.push(UINT8);
            out.push(v as u8);
        } else if v <= u16::MAX as i64 {
            out.push(UINT16);
            out.extend_from_slice(&(v as u16).to_be_bytes());
        } else if v <= u32::MAX as i64 {
            out.push(UINT32);
            out.extend_from_slice(&(v as u32).to_be_bytes());
        } else {
            out.push(UINT64);
            out.extend_from_slice(&(v as u64).to_be_bytes());
        }
    } else if v >= i8::MIN as i64 {
        out.push(INT8);
        out.push(v as i8 as u8);
    } else if v >= i16::MIN as i64 {
        out.push(INT16);
        out.extend_from_slice(&(v as i16).to_be_bytes());
    } else if v >= i32::MIN as i64 {
        out.push(INT32);
        out.extend_from_slice(&(v as i32).to_be_bytes());
    } else {
        out.push(INT64);
        out.extend_from_slice(&v.to_be_bytes());
    }
    out
}

pub fn encode_f64(v: f64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    out.push(FLOAT64);
    out.extend_from_slice(&v.to_bits().to_be_bytes());
    out
}

/// Encodes a string: `[tag][len][bytes][NUL]`, `len` excluding the
/// terminator.
pub fn encode_str(s: &str) -> Result<Vec<u8>, BinnError> {
    if s.len() > SIZE_MAX as usize {
        return Err(BinnError::SizeOverflow);
    }
    let len = s.len() as u32;
    let mut out = Vec::with_capacity(1 + size_field_len(len) + s.len() + 1);
    out.push(STRING);
    write_size(&mut out, len);
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    Ok(out)
}

/// Wraps a container payload with its `[tag][total size][count]` header.
///
/// The size field covers the header itself, so its own width feeds back
/// into the total: try the one-byte form first, fall back to four bytes.
fn finish_container(tag: u8, count: usize, payload: Vec<u8>) -> Result<Vec<u8>, BinnError> {
    if count > SIZE_MAX as usize {
        return Err(BinnError::SizeOverflow);
    }
    let count_len = size_field_len(count as u32);
    let small = 1 + 1 + count_len + payload.len();
    let total = if small < SIZE_WIDE as usize {
        small
    } else {
        1 + 4 + count_len + payload.len()
    };
    if total > SIZE_MAX as usize {
        return Err(BinnError::SizeOverflow);
    }
    let mut out = Vec::with_capacity(total);
    out.push(tag);
    write_size(&mut out, total as u32);
    write_size(&mut out, count as u32);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Builds a list container from pre-encoded items.
#[derive(Default)]
pub struct ListBuilder {
    payload: Vec<u8>,
    count: usize,
}

impl ListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, encoded: &[u8]) {
        self.payload.extend_from_slice(encoded);
        self.count += 1;
    }

    pub fn finish(self) -> Result<Vec<u8>, BinnError> {
        finish_container(LIST, self.count, self.payload)
    }
}

/// Builds an object container from pre-encoded member values.
#[derive(Default)]
pub struct ObjectBuilder {
    payload: Vec<u8>,
    count: usize,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one member. Keys longer than 255 bytes cannot be
    /// represented (the key length field is one byte).
    pub fn push(&mut self, key: &str, encoded: &[u8]) -> Result<(), BinnError> {
        if key.len() > u8::MAX as usize {
            return Err(BinnError::KeyTooLong);
        }
        self.payload.push(key.len() as u8);
        self.payload.extend_from_slice(key.as_bytes());
        self.payload.extend_from_slice(encoded);
        self.count += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>, BinnError> {
        finish_container(OBJECT, self.count, self.payload)
    }
}
