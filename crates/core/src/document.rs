//! The document type: committed binary storage plus the patch entry
//! point.
//!
//! A patch call never touches the committed bytes until the whole batch
//! has decoded, resolved, applied, and re-encoded successfully; the new
//! encoding is swapped in as the last step. On any error the document
//! is byte-for-byte unchanged. All scratch state lives in one
//! [`NodeArena`](crate::node::NodeArena) that is dropped wholesale when
//! the call returns.

use serde_json::Value;

use crate::codec::ops_from_json;
use crate::decode::tree_from_binn;
use crate::encode::encode_document;
use crate::error::DomError;
use crate::node::NodeArena;
use crate::patch::{apply_ops, resolve_ops, PatchOp};

/// A binary-encoded document. An empty byte vector is the explicit
/// empty document (no value, distinct from JSON `null`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    data: Vec<u8>,
}

impl Document {
    /// The explicit empty document.
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Wraps existing binary storage, checking that a non-empty payload
    /// starts with a well-formed value header.
    pub fn from_binn(data: Vec<u8>) -> Result<Self, DomError> {
        if !data.is_empty() {
            docbin_binn::classify(&data)?;
        }
        Ok(Self { data })
    }

    /// Encodes a JSON value as a new document.
    pub fn from_value(value: &Value) -> Result<Self, DomError> {
        Ok(Self {
            data: docbin_binn::from_json(value)?,
        })
    }

    /// Parses JSON text and encodes it as a new document.
    pub fn from_json(text: &str) -> Result<Self, DomError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DomError::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// True when the document holds no value at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The document as JSON; `None` for the empty document.
    pub fn to_value(&self) -> Result<Option<Value>, DomError> {
        if self.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(docbin_binn::to_json(&self.data)?))
    }

    /// Applies an ordered batch of patch operations, all or nothing.
    ///
    /// The batch runs on a scratch tree: decode, resolve every pointer
    /// and value, apply in order, re-encode. Only then is the new
    /// encoding committed. The first error aborts the batch and leaves
    /// the document unchanged.
    pub fn patch(&mut self, ops: &[PatchOp]) -> Result<(), DomError> {
        let mut arena = NodeArena::new();
        let root = tree_from_binn(&mut arena, &self.data)?;
        let resolved = resolve_ops(&mut arena, ops)?;
        apply_ops(&mut arena, root, &resolved)?;
        let encoded = encode_document(&arena, root)?;
        self.data = encoded;
        Ok(())
    }

    /// Applies a patch given as RFC 6902 JSON text.
    pub fn patch_json(&mut self, text: &str) -> Result<(), DomError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DomError::Json(e.to_string()))?;
        let ops = ops_from_json(&value)?;
        self.patch(&ops)
    }
}
