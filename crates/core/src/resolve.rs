//! Pointer resolution over the node tree.
//!
//! [`find`] walks pointer tokens from a starting node: object steps
//! match children on exact key equality, array steps on the stored
//! element index. [`detach`] additionally unlinks the resolved node so
//! it can be dropped or re-attached (move).

use docbin_json_pointer::{array_index, JsonPointer};

use crate::node::{NodeArena, NodeId, NodeValue};

/// One resolution step from `node` through `token`.
fn step(arena: &NodeArena, node: NodeId, token: &str) -> Option<NodeId> {
    match arena.node(node).value {
        NodeValue::Object => arena.find_child_by_key(node, token),
        NodeValue::Array => arena.find_child_by_index(node, array_index(token)?),
        _ => None,
    }
}

/// Resolves `tokens` starting at `start`. `None` when any step fails or
/// a scalar is reached with tokens remaining.
pub fn find(arena: &NodeArena, start: NodeId, tokens: &[String]) -> Option<NodeId> {
    let mut current = start;
    for token in tokens {
        current = step(arena, current, token)?;
    }
    Some(current)
}

/// Resolves the node at `pointer`, unlinks it from its parent, and
/// returns it with cleared sibling links. Array parents are renumbered
/// so later positional lookups stay consistent.
///
/// `None` when the pointer is the root or when parent or child do not
/// resolve.
pub fn detach(arena: &mut NodeArena, root: NodeId, pointer: &JsonPointer) -> Option<NodeId> {
    let (parent_tokens, leaf) = pointer.split_last()?;
    let parent = find(arena, root, parent_tokens)?;
    let child = step(arena, parent, leaf)?;
    arena.unlink(parent, child);
    if arena.node(parent).value == NodeValue::Array {
        arena.renumber_children(parent);
    }
    Some(child)
}
