//! serde_json bridge: JSON values in, binn bytes out, and back.
//!
//! JSON text itself is never parsed here; callers hand in
//! `serde_json::Value` and get one back. Object member order is
//! preserved in both directions.

use serde_json::Value;

use crate::decoder::{classify, BinnValue};
use crate::encoder::{encode_bool, encode_f64, encode_i64, encode_null, encode_str};
use crate::encoder::{ListBuilder, ObjectBuilder};
use crate::error::BinnError;

/// Encodes a JSON value as one binn value.
pub fn from_json(value: &Value) -> Result<Vec<u8>, BinnError> {
    match value {
        Value::Null => Ok(encode_null()),
        Value::Bool(b) => Ok(encode_bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(encode_i64(i))
            } else if let Some(f) = n.as_f64() {
                // u64 above i64::MAX lands here, width traded for range
                Ok(encode_f64(f))
            } else {
                Err(BinnError::IntOutOfRange)
            }
        }
        Value::String(s) => encode_str(s),
        Value::Array(items) => {
            let mut list = ListBuilder::new();
            for item in items {
                list.push(&from_json(item)?);
            }
            list.finish()
        }
        Value::Object(members) => {
            let mut obj = ObjectBuilder::new();
            for (key, member) in members {
                obj.push(key, &from_json(member)?)?;
            }
            obj.finish()
        }
    }
}

/// Decodes one binn value into a JSON value.
///
/// Map containers become objects keyed by the decimal rendering of their
/// integer keys. Non-finite floats have no JSON rendering and decode to
/// `null`.
pub fn to_json(data: &[u8]) -> Result<Value, BinnError> {
    value_to_json(classify(data)?)
}

fn value_to_json(value: BinnValue<'_>) -> Result<Value, BinnError> {
    Ok(match value {
        BinnValue::Null => Value::Null,
        BinnValue::Bool(b) => Value::Bool(b),
        BinnValue::I64(i) => Value::from(i),
        BinnValue::F64(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        BinnValue::Str(s) => Value::String(s.to_owned()),
        BinnValue::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(value_to_json(item?)?);
            }
            Value::Array(out)
        }
        BinnValue::Object(members) => {
            let mut out = serde_json::Map::new();
            for member in members {
                let (key, val) = member?;
                out.insert(key.to_owned(), value_to_json(val)?);
            }
            Value::Object(out)
        }
        BinnValue::Map(members) => {
            let mut out = serde_json::Map::new();
            for member in members {
                let (key, val) = member?;
                out.insert(key.to_string(), value_to_json(val)?);
            }
            Value::Object(out)
        }
    })
}
