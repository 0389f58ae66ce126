//! binn-style compact binary JSON encoding.
//!
//! A self-describing binary serialization for JSON-like values: one type
//! byte per value, variable-width size fields, and containers that carry
//! their total byte size up front so a reader can skip them without
//! walking their contents.
//!
//! Wire format:
//! - Scalars: `[tag]` (+ big-endian payload). Integers are written at the
//!   smallest width that holds the value.
//! - Strings: `[tag][len][bytes][NUL]`, `len` excluding the terminator.
//! - Containers: `[tag][total size][count][payload]`, total size covering
//!   the header itself. Object members are `[key len u8][key][value]`,
//!   map members `[i32 be key][value]`, list items consecutive values.
//! - Size/count fields: one byte below 128, otherwise four bytes
//!   big-endian with the top bit set.
//!
//! The decoder side exposes a borrowed [`BinnValue`] classification with
//! lazy container iterators; the encoder side exposes scalar encoders and
//! bottom-up container builders, so container sizes never need
//! backfilling.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;

pub use decoder::{classify, BinnValue, ListIter, MapIter, ObjectIter};
pub use encoder::{
    encode_bool, encode_f64, encode_i64, encode_null, encode_str, ListBuilder, ObjectBuilder,
};
pub use error::BinnError;
pub use json::{from_json, to_json};
