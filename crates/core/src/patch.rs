//! Patch operations and the apply engine.
//!
//! A batch runs in two phases over one scratch arena. The resolve phase
//! parses every pointer and materializes every value before any
//! mutation; the apply phase then walks the operations strictly in
//! input order, so later operations observe earlier effects. The first
//! error in either phase aborts the batch.

use docbin_json_pointer::{array_index, JsonPointer};
use serde_json::Value;

use crate::decode::{tree_from_binn, tree_from_json};
use crate::error::DomError;
use crate::node::{NodeArena, NodeId, NodeValue};
use crate::resolve::{detach, find};

/// Value payload of an `add`/`replace` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    /// A typed literal, scalar or container.
    Value(Value),
    /// Nested JSON text, parsed when the operation is resolved.
    Json(String),
    /// A binary-encoded subdocument.
    Binn(Vec<u8>),
}

/// One patch operation. Paths are RFC 6901 pointer text; the empty path
/// addresses the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    Add { path: String, value: PatchValue },
    Remove { path: String },
    Replace { path: String, value: PatchValue },
    Move { path: String, from: String },
    Copy { path: String, from: String },
}

/// An operation with parsed pointers and an arena-materialized value.
pub(crate) enum ResolvedPatch {
    Add { path: JsonPointer, value: NodeId },
    Remove { path: JsonPointer },
    Replace { path: JsonPointer, value: NodeId },
    Move { path: JsonPointer, from: JsonPointer },
    Copy { path: JsonPointer, from: JsonPointer },
}

/// Resolve phase: parse pointers and materialize values for the whole
/// batch before anything mutates.
pub(crate) fn resolve_ops(
    arena: &mut NodeArena,
    ops: &[PatchOp],
) -> Result<Vec<ResolvedPatch>, DomError> {
    let mut resolved = Vec::with_capacity(ops.len());
    for op in ops {
        resolved.push(resolve_op(arena, op)?);
    }
    Ok(resolved)
}

fn resolve_op(arena: &mut NodeArena, op: &PatchOp) -> Result<ResolvedPatch, DomError> {
    Ok(match op {
        PatchOp::Add { path, value } => ResolvedPatch::Add {
            path: JsonPointer::parse(path)?,
            value: materialize(arena, value)?,
        },
        PatchOp::Remove { path } => ResolvedPatch::Remove {
            path: JsonPointer::parse(path)?,
        },
        PatchOp::Replace { path, value } => ResolvedPatch::Replace {
            path: JsonPointer::parse(path)?,
            value: materialize(arena, value)?,
        },
        PatchOp::Move { path, from } => ResolvedPatch::Move {
            path: JsonPointer::parse(path)?,
            from: JsonPointer::parse(from)?,
        },
        PatchOp::Copy { path, from } => ResolvedPatch::Copy {
            path: JsonPointer::parse(path)?,
            from: JsonPointer::parse(from)?,
        },
    })
}

fn materialize(arena: &mut NodeArena, value: &PatchValue) -> Result<NodeId, DomError> {
    match value {
        PatchValue::Value(v) => tree_from_json(arena, v),
        PatchValue::Json(text) => {
            let v: Value =
                serde_json::from_str(text).map_err(|e| DomError::Json(e.to_string()))?;
            tree_from_json(arena, &v)
        }
        PatchValue::Binn(bytes) => {
            // An empty subdocument carries no value to insert.
            if bytes.is_empty() {
                return Err(DomError::PatchNoValue);
            }
            tree_from_binn(arena, bytes)
        }
    }
}

/// Apply phase: operations strictly in input order, first error aborts.
pub(crate) fn apply_ops(
    arena: &mut NodeArena,
    root: NodeId,
    resolved: &[ResolvedPatch],
) -> Result<(), DomError> {
    for rp in resolved {
        apply_one(arena, root, rp)?;
    }
    Ok(())
}

fn not_found(pointer: &JsonPointer) -> DomError {
    DomError::PathNotFound(pointer.to_string())
}

fn apply_one(arena: &mut NodeArena, root: NodeId, rp: &ResolvedPatch) -> Result<(), DomError> {
    match rp {
        ResolvedPatch::Remove { path } => {
            if path.is_root() {
                // The root slot is overwritten in place; ids stay valid.
                arena.tombstone(root);
                return Ok(());
            }
            detach(arena, root, path).ok_or_else(|| not_found(path))?;
            Ok(())
        }
        ResolvedPatch::Add { path, value } => {
            if path.is_root() {
                arena.replace_content(root, *value);
                return Ok(());
            }
            insert(arena, root, path, *value)
        }
        ResolvedPatch::Replace { path, value } => {
            if path.is_root() {
                arena.replace_content(root, *value);
                return Ok(());
            }
            detach(arena, root, path).ok_or_else(|| not_found(path))?;
            insert(arena, root, path, *value)
        }
        ResolvedPatch::Move { path, from } => {
            if path.is_root() && from.is_root() {
                return Ok(());
            }
            let value = detach(arena, root, from).ok_or_else(|| not_found(from))?;
            if path.is_root() {
                arena.replace_content(root, value);
                return Ok(());
            }
            insert(arena, root, path, value)
        }
        ResolvedPatch::Copy { path, from } => {
            if path.is_root() && from.is_root() {
                return Ok(());
            }
            let src = find(arena, root, from.tokens()).ok_or_else(|| not_found(from))?;
            // Deep copy: a later mutation of the source must not leak
            // into the copied location.
            let value = arena.deep_copy(src)?;
            if path.is_root() {
                arena.replace_content(root, value);
                return Ok(());
            }
            insert(arena, root, path, value)
        }
    }
}

/// Inserts `value` at a non-root `path`: upsert by key under objects,
/// positional insert (with the `-` append sentinel) under arrays.
fn insert(
    arena: &mut NodeArena,
    root: NodeId,
    path: &JsonPointer,
    value: NodeId,
) -> Result<(), DomError> {
    let (parent_tokens, leaf) = match path.split_last() {
        Some(split) => split,
        None => return Err(DomError::PatchTargetInvalid(path.to_string())),
    };
    let parent = find(arena, root, parent_tokens)
        .ok_or_else(|| DomError::PatchTargetInvalid(path.to_string()))?;

    match arena.node(parent).value {
        NodeValue::Object => {
            arena.node_mut(value).key = Some(leaf.to_owned());
            if let Some(existing) = arena.find_child_by_key(parent, leaf) {
                // Upsert: take over the existing member's list position
                // and slot index, then drop the old member.
                let slot = arena.node(existing).index;
                arena.node_mut(value).index = slot;
                arena.insert_before(parent, existing, value);
                arena.unlink(parent, existing);
            } else {
                let slot = arena.child_count(parent) as i64;
                arena.node_mut(value).index = slot;
                arena.append_child(parent, value);
            }
            Ok(())
        }
        NodeValue::Array => {
            arena.node_mut(value).key = None;
            let count = arena.child_count(parent) as i64;
            if leaf == "-" {
                arena.append_child(parent, value);
            } else {
                match array_index(leaf) {
                    Some(i) if i == count => arena.append_child(parent, value),
                    Some(i) => {
                        let anchor = arena
                            .find_child_by_index(parent, i)
                            .ok_or_else(|| DomError::PathNotFound(path.to_string()))?;
                        arena.insert_before(parent, anchor, value);
                    }
                    None => return Err(DomError::PathNotFound(path.to_string())),
                }
            }
            arena.renumber_children(parent);
            Ok(())
        }
        _ => Err(DomError::PatchTargetInvalid(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_document;
    use serde_json::json;

    /// Applies `ops` to `doc` at the arena level and returns the result
    /// as JSON (`None` for a removed document).
    fn run(doc: Value, ops: &[PatchOp]) -> Result<Option<Value>, DomError> {
        let mut arena = NodeArena::new();
        let root = tree_from_json(&mut arena, &doc)?;
        let resolved = resolve_ops(&mut arena, ops)?;
        apply_ops(&mut arena, root, &resolved)?;
        let bytes = encode_document(&arena, root)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(docbin_binn::to_json(&bytes)?))
    }

    fn add(path: &str, value: Value) -> PatchOp {
        PatchOp::Add {
            path: path.into(),
            value: PatchValue::Value(value),
        }
    }

    #[test]
    fn root_remove_tombstones_document() {
        let out = run(json!({"a": 1}), &[PatchOp::Remove { path: "".into() }]).unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn root_replace_swaps_whole_document() {
        let out = run(
            json!([1, 2, 3]),
            &[PatchOp::Replace {
                path: "".into(),
                value: PatchValue::Value(json!({"a": 1})),
            }],
        )
        .unwrap();
        assert_eq!(out, Some(json!({"a": 1})));
    }

    #[test]
    fn add_upserts_existing_key_without_duplicate() {
        let out = run(json!({"a": 1, "b": 2}), &[add("/a", json!(9))]).unwrap();
        assert_eq!(out, Some(json!({"a": 9, "b": 2})));
        // Upsert keeps the member's position
        let keys: Vec<String> = out
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn add_appends_new_member() {
        let out = run(json!({"a": 1}), &[add("/b", json!([true]))]).unwrap();
        assert_eq!(out, Some(json!({"a": 1, "b": [true]})));
    }

    #[test]
    fn array_insert_shifts_and_renumbers() {
        let out = run(json!(["x", "y"]), &[add("/1", json!("z"))]).unwrap();
        assert_eq!(out, Some(json!(["x", "z", "y"])));
    }

    #[test]
    fn array_insert_then_remove_front() {
        let ops = [
            add("/1", json!("z")),
            PatchOp::Remove { path: "/0".into() },
        ];
        let out = run(json!(["x", "y"]), &ops).unwrap();
        assert_eq!(out, Some(json!(["z", "y"])));
    }

    #[test]
    fn array_append_with_dash_and_len_index() {
        let out = run(json!([1]), &[add("/-", json!(2)), add("/2", json!(3))]).unwrap();
        assert_eq!(out, Some(json!([1, 2, 3])));
    }

    #[test]
    fn array_index_past_end_is_not_found() {
        let err = run(json!([1]), &[add("/5", json!(9))]).unwrap_err();
        assert!(matches!(err, DomError::PathNotFound(_)));
        let err = run(json!([1]), &[add("/x", json!(9))]).unwrap_err();
        assert!(matches!(err, DomError::PathNotFound(_)));
    }

    #[test]
    fn replace_requires_existing_target() {
        let err = run(
            json!({"a": 1}),
            &[PatchOp::Replace {
                path: "/missing".into(),
                value: PatchValue::Value(json!(2)),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, DomError::PathNotFound(_)));
    }

    #[test]
    fn remove_requires_existing_target() {
        let err = run(
            json!({"a": 1}),
            &[PatchOp::Remove {
                path: "/missing".into(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, DomError::PathNotFound(_)));
    }

    #[test]
    fn insert_under_scalar_is_invalid_target() {
        let err = run(json!({"a": 1}), &[add("/a/b", json!(2))]).unwrap_err();
        assert!(matches!(err, DomError::PatchTargetInvalid(_)));
    }

    #[test]
    fn move_is_detach_plus_insert() {
        let out = run(
            json!({"a": 1, "b": 2}),
            &[PatchOp::Move {
                path: "/c".into(),
                from: "/a".into(),
            }],
        )
        .unwrap();
        assert_eq!(out, Some(json!({"b": 2, "c": 1})));
    }

    #[test]
    fn move_carries_whole_subtree() {
        let out = run(
            json!({"src": {"x": [1, 2]}}),
            &[PatchOp::Move {
                path: "/dst".into(),
                from: "/src".into(),
            }],
        )
        .unwrap();
        assert_eq!(out, Some(json!({"dst": {"x": [1, 2]}})));
    }

    #[test]
    fn move_missing_source_fails() {
        let err = run(
            json!({"a": 1}),
            &[PatchOp::Move {
                path: "/b".into(),
                from: "/missing".into(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, DomError::PathNotFound(_)));
    }

    #[test]
    fn copy_does_not_alias_its_source() {
        let ops = [
            PatchOp::Copy {
                path: "/b".into(),
                from: "/a".into(),
            },
            PatchOp::Replace {
                path: "/a/x".into(),
                value: PatchValue::Value(json!(99)),
            },
        ];
        let out = run(json!({"a": {"x": 1}}), &ops).unwrap();
        assert_eq!(out, Some(json!({"a": {"x": 99}, "b": {"x": 1}})));
    }

    #[test]
    fn move_root_onto_itself_is_a_noop() {
        let ops = [PatchOp::Move {
            path: "".into(),
            from: "".into(),
        }];
        let out = run(json!({"a": 1}), &ops).unwrap();
        assert_eq!(out, Some(json!({"a": 1})));
    }

    #[test]
    fn move_to_root_replaces_document() {
        let ops = [PatchOp::Move {
            path: "".into(),
            from: "/a".into(),
        }];
        let out = run(json!({"a": {"inner": true}}), &ops).unwrap();
        assert_eq!(out, Some(json!({"inner": true})));
    }

    #[test]
    fn copy_to_root_replaces_document() {
        let ops = [PatchOp::Copy {
            path: "".into(),
            from: "/a".into(),
        }];
        let out = run(json!({"a": [1]}), &ops).unwrap();
        assert_eq!(out, Some(json!([1])));
    }

    #[test]
    fn value_from_json_text() {
        let ops = [PatchOp::Add {
            path: "/cfg".into(),
            value: PatchValue::Json(r#"{"depth": 3}"#.into()),
        }];
        let out = run(json!({}), &ops).unwrap();
        assert_eq!(out, Some(json!({"cfg": {"depth": 3}})));
    }

    #[test]
    fn bad_json_text_fails_resolve() {
        let ops = [PatchOp::Add {
            path: "/cfg".into(),
            value: PatchValue::Json("{not json".into()),
        }];
        let err = run(json!({}), &ops).unwrap_err();
        assert!(matches!(err, DomError::Json(_)));
    }

    #[test]
    fn value_from_binary_subdocument() {
        let sub = docbin_binn::from_json(&json!([1, 2])).unwrap();
        let ops = [PatchOp::Add {
            path: "/xs".into(),
            value: PatchValue::Binn(sub),
        }];
        let out = run(json!({}), &ops).unwrap();
        assert_eq!(out, Some(json!({"xs": [1, 2]})));
    }

    #[test]
    fn empty_binary_value_is_no_value() {
        let ops = [PatchOp::Add {
            path: "/x".into(),
            value: PatchValue::Binn(Vec::new()),
        }];
        assert_eq!(run(json!({}), &ops), Err(DomError::PatchNoValue));
    }

    #[test]
    fn later_ops_observe_earlier_effects() {
        let ops = [
            add("/a", json!({})),
            add("/a/b", json!(1)),
            PatchOp::Move {
                path: "/c".into(),
                from: "/a/b".into(),
            },
        ];
        let out = run(json!({}), &ops).unwrap();
        assert_eq!(out, Some(json!({"a": {}, "c": 1})));
    }
}
