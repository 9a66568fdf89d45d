use crate::arena::{Arena, Handle};
use std::cmp;

/// A struct representing a vertex of a search tree.
///
/// Children are owned through the arena; `parent` is a navigation link only.
pub struct Node<T> {
    pub key: T,
    pub height: i32,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T> Node<T> {
    pub fn new(key: T) -> Self {
        Node {
            key,
            height: 0,
            parent: None,
            left: None,
            right: None,
        }
    }
}

/// Cached height of an optional node. An absent node has height `-1`.
pub fn height<T>(arena: &Arena<Node<T>>, node: Option<Handle>) -> i32 {
    match node {
        None => -1,
        Some(node) => arena[node].height,
    }
}

/// Height a node should have given the cached heights of its children.
pub fn updated_height<T>(arena: &Arena<Node<T>>, node: Handle) -> i32 {
    let Node { left, right, .. } = arena[node];
    cmp::max(height(arena, left), height(arena, right)) + 1
}

pub fn update<T>(arena: &mut Arena<Node<T>>, node: Handle) {
    arena[node].height = updated_height(arena, node);
}

/// Left height minus right height.
pub fn balance<T>(arena: &Arena<Node<T>>, node: Handle) -> i32 {
    let Node { left, right, .. } = arena[node];
    height(arena, left) - height(arena, right)
}
