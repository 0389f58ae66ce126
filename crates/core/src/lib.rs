//! Document DOM and JSON Patch engine over the binn binary encoding.
//!
//! A [`Document`] owns one binary-encoded JSON-like value. Patching
//! decodes it into a pointer-linked tree of typed nodes inside a
//! per-call arena, applies an ordered batch of RFC 6902 operations
//! (`add`, `remove`, `replace`, `move`, `copy`) against that tree, and
//! re-encodes, committing the new bytes only if every operation
//! succeeded.
//!
//! # Example
//!
//! ```
//! use docbin_core::{Document, PatchOp, PatchValue};
//! use serde_json::json;
//!
//! let mut doc = Document::from_value(&json!({"a": 1})).unwrap();
//! doc.patch(&[PatchOp::Add {
//!     path: "/b".into(),
//!     value: PatchValue::Value(json!([true])),
//! }])
//! .unwrap();
//! assert_eq!(doc.to_value().unwrap(), Some(json!({"a": 1, "b": [true]})));
//! ```

pub mod codec;
pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod node;
pub mod patch;
pub mod resolve;

pub use codec::{ops_from_json, ops_to_json};
pub use decode::{tree_from_binn, tree_from_json};
pub use document::Document;
pub use encode::{encode_document, encode_tree};
pub use error::DomError;
pub use node::{Node, NodeArena, NodeId, NodeValue};
pub use patch::{PatchOp, PatchValue};
pub use resolve::{detach, find};
