//! Node tree → binary document construction.
//!
//! Containers are rebuilt bottom-up: children encode first, in sibling
//! order, and the binn builders wrap them. A failed branch drops its
//! partial buffers on the way out.

use docbin_binn::{encode_bool, encode_f64, encode_i64, encode_null, encode_str};
use docbin_binn::{ListBuilder, ObjectBuilder};

use crate::error::DomError;
use crate::node::{NodeArena, NodeId, NodeValue};

/// Encodes the tree rooted at `root` as a whole document.
///
/// A tombstone root produces the explicit empty-document marker (an
/// empty byte vector) instead of a binary value.
pub fn encode_document(arena: &NodeArena, root: NodeId) -> Result<Vec<u8>, DomError> {
    if arena.node(root).value == NodeValue::None {
        return Ok(Vec::new());
    }
    encode_tree(arena, root)
}

/// Encodes one node (and its subtree) as a binn value.
pub fn encode_tree(arena: &NodeArena, node: NodeId) -> Result<Vec<u8>, DomError> {
    match &arena.node(node).value {
        NodeValue::None => Err(DomError::Creation),
        NodeValue::Null => Ok(encode_null()),
        NodeValue::Bool(b) => Ok(encode_bool(*b)),
        NodeValue::I64(i) => Ok(encode_i64(*i)),
        NodeValue::F64(f) => Ok(encode_f64(*f)),
        NodeValue::Str(s) => Ok(encode_str(s)?),
        NodeValue::Array => {
            let mut list = ListBuilder::new();
            for child in arena.children(node) {
                list.push(&encode_tree(arena, child)?);
            }
            Ok(list.finish()?)
        }
        NodeValue::Object => {
            let mut obj = ObjectBuilder::new();
            for child in arena.children(node) {
                let encoded = encode_tree(arena, child)?;
                match &arena.node(child).key {
                    Some(key) => obj.push(key, &encoded)?,
                    None => return Err(DomError::Creation),
                }
            }
            Ok(obj.finish()?)
        }
    }
}
