//! Binary document → node tree construction.
//!
//! Every encoded value maps to one arena node: integer widths collapse
//! into `I64`, both float widths into `F64`, and both object and map
//! containers into `Object` nodes (map members keep their integer key in
//! `index` and its decimal rendering as `key`). Children are appended in
//! source order, so sibling order mirrors the encoding.

use docbin_binn::BinnValue;
use serde_json::Value;

use crate::error::DomError;
use crate::node::{NodeArena, NodeId, NodeValue};

/// Decodes a whole binary document into a tree, returning the root.
///
/// An empty buffer is the explicit empty-document marker and decodes to
/// a `None` tombstone root.
pub fn tree_from_binn(arena: &mut NodeArena, data: &[u8]) -> Result<NodeId, DomError> {
    if data.is_empty() {
        return arena.alloc(NodeValue::None, None, -1);
    }
    let value = docbin_binn::classify(data)?;
    node_from_binn(arena, value, None, -1)
}

fn node_from_binn(
    arena: &mut NodeArena,
    value: BinnValue<'_>,
    key: Option<String>,
    index: i64,
) -> Result<NodeId, DomError> {
    match value {
        BinnValue::Null => arena.alloc(NodeValue::Null, key, index),
        BinnValue::Bool(b) => arena.alloc(NodeValue::Bool(b), key, index),
        BinnValue::I64(i) => arena.alloc(NodeValue::I64(i), key, index),
        BinnValue::F64(f) => arena.alloc(NodeValue::F64(f), key, index),
        BinnValue::Str(s) => arena.alloc(NodeValue::Str(s.to_owned()), key, index),
        BinnValue::Object(members) => {
            let id = arena.alloc(NodeValue::Object, key, index)?;
            for (slot, member) in members.enumerate() {
                let (member_key, member_value) = member?;
                let child = node_from_binn(
                    arena,
                    member_value,
                    Some(member_key.to_owned()),
                    slot as i64,
                )?;
                arena.append_child(id, child);
            }
            Ok(id)
        }
        BinnValue::Map(members) => {
            let id = arena.alloc(NodeValue::Object, key, index)?;
            for member in members {
                let (member_key, member_value) = member?;
                let child = node_from_binn(
                    arena,
                    member_value,
                    Some(member_key.to_string()),
                    member_key as i64,
                )?;
                arena.append_child(id, child);
            }
            Ok(id)
        }
        BinnValue::List(items) => {
            let id = arena.alloc(NodeValue::Array, key, index)?;
            for (position, item) in items.enumerate() {
                let element = item?;
                let child = node_from_binn(arena, element, None, position as i64)?;
                arena.append_child(id, child);
            }
            Ok(id)
        }
    }
}

/// Builds a tree from a JSON value. Used to materialize patch values.
pub fn tree_from_json(arena: &mut NodeArena, value: &Value) -> Result<NodeId, DomError> {
    node_from_json(arena, value, None, -1)
}

fn node_from_json(
    arena: &mut NodeArena,
    value: &Value,
    key: Option<String>,
    index: i64,
) -> Result<NodeId, DomError> {
    match value {
        Value::Null => arena.alloc(NodeValue::Null, key, index),
        Value::Bool(b) => arena.alloc(NodeValue::Bool(*b), key, index),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                arena.alloc(NodeValue::I64(i), key, index)
            } else if let Some(f) = n.as_f64() {
                arena.alloc(NodeValue::F64(f), key, index)
            } else {
                Err(DomError::Creation)
            }
        }
        Value::String(s) => arena.alloc(NodeValue::Str(s.clone()), key, index),
        Value::Array(items) => {
            let id = arena.alloc(NodeValue::Array, key, index)?;
            for (position, item) in items.iter().enumerate() {
                let child = node_from_json(arena, item, None, position as i64)?;
                arena.append_child(id, child);
            }
            Ok(id)
        }
        Value::Object(members) => {
            let id = arena.alloc(NodeValue::Object, key, index)?;
            for (slot, (member_key, member_value)) in members.iter().enumerate() {
                let child =
                    node_from_json(arena, member_value, Some(member_key.clone()), slot as i64)?;
                arena.append_child(id, child);
            }
            Ok(id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_scalars_and_containers() {
        let doc = json!({"a": 1, "b": [true, null, "s"], "c": 2.5});
        let bytes = docbin_binn::from_json(&doc).unwrap();

        let mut arena = NodeArena::new();
        let root = tree_from_binn(&mut arena, &bytes).unwrap();
        assert_eq!(arena.node(root).value, NodeValue::Object);

        let a = arena.find_child_by_key(root, "a").unwrap();
        assert_eq!(arena.node(a).value, NodeValue::I64(1));
        assert_eq!(arena.node(a).index, 0);

        let b = arena.find_child_by_key(root, "b").unwrap();
        assert_eq!(arena.node(b).value, NodeValue::Array);
        let kinds: Vec<NodeValue> = arena
            .children(b)
            .map(|c| arena.node(c).value.clone())
            .collect();
        assert_eq!(
            kinds,
            [
                NodeValue::Bool(true),
                NodeValue::Null,
                NodeValue::Str("s".into())
            ]
        );
        let indexes: Vec<i64> = arena.children(b).map(|c| arena.node(c).index).collect();
        assert_eq!(indexes, [0, 1, 2]);

        let c = arena.find_child_by_key(root, "c").unwrap();
        assert_eq!(arena.node(c).value, NodeValue::F64(2.5));
        assert_eq!(arena.node(c).index, 2);
    }

    #[test]
    fn empty_buffer_decodes_to_tombstone() {
        let mut arena = NodeArena::new();
        let root = tree_from_binn(&mut arena, &[]).unwrap();
        assert_eq!(arena.node(root).value, NodeValue::None);
    }

    #[test]
    fn unknown_tag_is_a_creation_error() {
        let mut arena = NodeArena::new();
        assert_eq!(
            tree_from_binn(&mut arena, &[0x33]),
            Err(DomError::Creation)
        );
    }

    #[test]
    fn truncated_container_is_an_invalid_error() {
        let doc = json!({"k": [1, 2, 3]});
        let bytes = docbin_binn::from_json(&doc).unwrap();
        let mut arena = NodeArena::new();
        assert_eq!(
            tree_from_binn(&mut arena, &bytes[..bytes.len() - 2]),
            Err(DomError::Invalid)
        );
    }

    #[test]
    fn json_tree_matches_binn_tree_shape() {
        let doc = json!({"x": {"y": [1]}});
        let mut arena = NodeArena::new();
        let root = tree_from_json(&mut arena, &doc).unwrap();
        let x = arena.find_child_by_key(root, "x").unwrap();
        let y = arena.find_child_by_key(x, "y").unwrap();
        assert_eq!(arena.node(y).value, NodeValue::Array);
        assert_eq!(arena.child_count(y), 1);
    }
}
