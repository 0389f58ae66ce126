//! JSON codec for patch operations.
//!
//! Translates RFC 6902 JSON arrays
//! (`[{"op": "add", "path": "/a", "value": 1}, ...]`) to and from
//! [`PatchOp`] lists. Only the five mutating operations are supported;
//! `test` and anything else are rejected at this boundary.

use serde_json::{json, Value};

use crate::error::DomError;
use crate::patch::{PatchOp, PatchValue};

/// Decodes a JSON patch array into operations.
pub fn ops_from_json(value: &Value) -> Result<Vec<PatchOp>, DomError> {
    let items = value
        .as_array()
        .ok_or_else(|| DomError::InvalidOp("patch must be an array".into()))?;
    items.iter().map(op_from_json).collect()
}

fn op_from_json(value: &Value) -> Result<PatchOp, DomError> {
    let members = value
        .as_object()
        .ok_or_else(|| DomError::InvalidOp("operation must be an object".into()))?;
    let op = members
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| DomError::InvalidOp("operation is missing \"op\"".into()))?;
    let path = members
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| DomError::InvalidOp("operation is missing \"path\"".into()))?
        .to_string();

    match op {
        "add" | "replace" => {
            let value = members.get("value").cloned().ok_or(DomError::PatchNoValue)?;
            let value = PatchValue::Value(value);
            Ok(if op == "add" {
                PatchOp::Add { path, value }
            } else {
                PatchOp::Replace { path, value }
            })
        }
        "remove" => Ok(PatchOp::Remove { path }),
        "move" | "copy" => {
            let from = members
                .get("from")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    DomError::InvalidOp(format!("\"{op}\" operation is missing \"from\""))
                })?
                .to_string();
            Ok(if op == "move" {
                PatchOp::Move { path, from }
            } else {
                PatchOp::Copy { path, from }
            })
        }
        other => Err(DomError::InvalidOp(format!("unsupported op: {other}"))),
    }
}

/// Encodes operations back into a JSON patch array.
///
/// `Json` values are re-parsed and `Binn` values decoded, so the output
/// is always plain RFC 6902 JSON.
pub fn ops_to_json(ops: &[PatchOp]) -> Result<Value, DomError> {
    let mut out = Vec::with_capacity(ops.len());
    for op in ops {
        out.push(op_to_json(op)?);
    }
    Ok(Value::Array(out))
}

fn op_to_json(op: &PatchOp) -> Result<Value, DomError> {
    Ok(match op {
        PatchOp::Add { path, value } => value_member(json!({"op": "add", "path": path}), value)?,
        PatchOp::Remove { path } => json!({"op": "remove", "path": path}),
        PatchOp::Replace { path, value } => {
            value_member(json!({"op": "replace", "path": path}), value)?
        }
        PatchOp::Move { path, from } => json!({"op": "move", "path": path, "from": from}),
        PatchOp::Copy { path, from } => json!({"op": "copy", "path": path, "from": from}),
    })
}

fn value_member(mut op: Value, value: &PatchValue) -> Result<Value, DomError> {
    let rendered = match value {
        PatchValue::Value(v) => v.clone(),
        PatchValue::Json(text) => {
            serde_json::from_str(text).map_err(|e| DomError::Json(e.to_string()))?
        }
        PatchValue::Binn(bytes) => docbin_binn::to_json(bytes)?,
    };
    if let Some(members) = op.as_object_mut() {
        members.insert("value".into(), rendered);
    }
    Ok(op)
}
