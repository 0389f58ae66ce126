//! binn decoder: tag classification and container iteration cursors.
//!
//! [`classify`] reads one value at the start of a buffer and returns a
//! borrowed [`BinnValue`]. Containers are not walked eagerly; their
//! payload slice is handed to a lazy iterator, and the cursor skips to
//! the end of the container using its total-size header.

use crate::constants::*;
use crate::error::BinnError;

/// Internal cursor used during decoding.
#[derive(Clone)]
struct Cur<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cur<'a> {
    #[inline]
    fn check(&self, n: usize) -> Result<(), BinnError> {
        if self.pos + n > self.data.len() {
            Err(BinnError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, BinnError> {
        self.check(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8], BinnError> {
        self.check(n)?;
        let s = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    #[inline]
    fn u16_be(&mut self) -> Result<u16, BinnError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    #[inline]
    fn u32_be(&mut self) -> Result<u32, BinnError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    fn u64_be(&mut self) -> Result<u64, BinnError> {
        let b = self.take(8)?;
        Ok(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    #[inline]
    fn utf8(&mut self, len: usize) -> Result<&'a str, BinnError> {
        let b = self.take(len)?;
        std::str::from_utf8(b).map_err(|_| BinnError::InvalidUtf8)
    }

    /// Variable-width size/count field: one byte below 128, otherwise
    /// four bytes big-endian with the top bit set.
    fn size(&mut self) -> Result<usize, BinnError> {
        self.check(1)?;
        let first = self.data[self.pos];
        if first & 0x80 == 0 {
            self.pos += 1;
            Ok(first as usize)
        } else {
            let v = self.u32_be()?;
            Ok((v & SIZE_MAX) as usize)
        }
    }
}

/// One decoded binn value, borrowing from the input buffer.
///
/// Containers carry a lazy iterator over their members rather than
/// eagerly decoded children.
pub enum BinnValue<'a> {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(&'a str),
    List(ListIter<'a>),
    Map(MapIter<'a>),
    Object(ObjectIter<'a>),
}

/// Reads the value at the start of `data`.
///
/// Trailing bytes after the value are ignored; truncation, unknown tags,
/// and unrepresentable integers are errors.
pub fn classify(data: &[u8]) -> Result<BinnValue<'_>, BinnError> {
    let mut cur = Cur { data, pos: 0 };
    read_value(&mut cur)
}

fn read_value<'a>(cur: &mut Cur<'a>) -> Result<BinnValue<'a>, BinnError> {
    let tag = cur.u8()?;
    let value = match tag {
        NULL => BinnValue::Null,
        TRUE => BinnValue::Bool(true),
        FALSE => BinnValue::Bool(false),
        UINT8 => BinnValue::I64(cur.u8()? as i64),
        INT8 => BinnValue::I64(cur.u8()? as i8 as i64),
        UINT16 => BinnValue::I64(cur.u16_be()? as i64),
        INT16 => BinnValue::I64(cur.u16_be()? as i16 as i64),
        UINT32 => BinnValue::I64(cur.u32_be()? as i64),
        INT32 => BinnValue::I64(cur.u32_be()? as i32 as i64),
        UINT64 => {
            let v = cur.u64_be()?;
            if v > i64::MAX as u64 {
                return Err(BinnError::IntOutOfRange);
            }
            BinnValue::I64(v as i64)
        }
        INT64 => BinnValue::I64(cur.u64_be()? as i64),
        FLOAT32 => BinnValue::F64(f32::from_bits(cur.u32_be()?) as f64),
        FLOAT64 => BinnValue::F64(f64::from_bits(cur.u64_be()?)),
        STRING => {
            let len = cur.size()?;
            let s = cur.utf8(len)?;
            if cur.u8()? != 0 {
                return Err(BinnError::Malformed);
            }
            BinnValue::Str(s)
        }
        LIST | MAP | OBJECT => {
            // Container header: total size (including the header itself),
            // then member count, then the payload.
            let start = cur.pos - 1;
            let size = cur.size()?;
            let count = cur.size()?;
            let end = start
                .checked_add(size)
                .ok_or(BinnError::Malformed)?;
            if end < cur.pos || end > cur.data.len() {
                return Err(BinnError::Malformed);
            }
            let payload = Cur {
                data: &cur.data[..end],
                pos: cur.pos,
            };
            cur.pos = end;
            match tag {
                LIST => BinnValue::List(ListIter {
                    cur: payload,
                    remaining: count,
                }),
                MAP => BinnValue::Map(MapIter {
                    cur: payload,
                    remaining: count,
                }),
                _ => BinnValue::Object(ObjectIter {
                    cur: payload,
                    remaining: count,
                }),
            }
        }
        other => return Err(BinnError::UnknownTag(other)),
    };
    Ok(value)
}

/// Cursor over the items of a list container.
pub struct ListIter<'a> {
    cur: Cur<'a>,
    remaining: usize,
}

impl<'a> ListIter<'a> {
    /// Members left to yield.
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<BinnValue<'a>, BinnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match read_value(&mut self.cur) {
            Ok(v) => {
                self.remaining -= 1;
                Some(Ok(v))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

/// Cursor over the `(key, value)` members of an object container.
pub struct ObjectIter<'a> {
    cur: Cur<'a>,
    remaining: usize,
}

impl<'a> ObjectIter<'a> {
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn read_member(&mut self) -> Result<(&'a str, BinnValue<'a>), BinnError> {
        let klen = self.cur.u8()? as usize;
        let key = self.cur.utf8(klen)?;
        let value = read_value(&mut self.cur)?;
        Ok((key, value))
    }
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = Result<(&'a str, BinnValue<'a>), BinnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.read_member() {
            Ok(member) => {
                self.remaining -= 1;
                Some(Ok(member))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}

/// Cursor over the `(i32 key, value)` members of a map container.
pub struct MapIter<'a> {
    cur: Cur<'a>,
    remaining: usize,
}

impl<'a> MapIter<'a> {
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn read_member(&mut self) -> Result<(i32, BinnValue<'a>), BinnError> {
        let key = self.cur.u32_be()? as i32;
        let value = read_value(&mut self.cur)?;
        Ok((key, value))
    }
}

impl<'a> Iterator for MapIter<'a> {
    type Item = Result<(i32, BinnValue<'a>), BinnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.read_member() {
            Ok(member) => {
                self.remaining -= 1;
                Some(Ok(member))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}
