use crate::arena::{Arena, Handle};
use crate::bst::node::{self, Node};
use crate::error::{Error, Result, Violation};
use log::trace;
use std::cmp::{self, Ordering};
use std::vec::Vec;

/// The nodes of a tree together with the handle of its root.
///
/// Every primitive here assumes the tree is well formed. Nothing on these paths verifies the
/// ordering or parent links; `validate` is the only place that does.
pub struct RawTree<T> {
    pub arena: Arena<Node<T>>,
    pub root: Option<Handle>,
}

impl<T> RawTree<T> {
    pub fn new() -> Self {
        RawTree {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RawTree {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn find_min(&self, node: Handle) -> Handle {
        let mut curr = node;
        while let Some(left) = self.arena[curr].left {
            curr = left;
        }
        curr
    }

    pub fn find_max(&self, node: Handle) -> Handle {
        let mut curr = node;
        while let Some(right) = self.arena[curr].right {
            curr = right;
        }
        curr
    }

    /// In-order successor of `node`.
    pub fn next_larger(&self, node: Handle) -> Result<Handle> {
        if let Some(right) = self.arena[node].right {
            return Ok(self.find_min(right));
        }
        let mut curr = node;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].left == Some(curr) {
                return Ok(parent);
            }
            curr = parent;
        }
        Err(Error::NoSuccessor)
    }

    /// In-order predecessor of `node`.
    pub fn next_smaller(&self, node: Handle) -> Result<Handle> {
        if let Some(left) = self.arena[node].left {
            return Ok(self.find_max(left));
        }
        let mut curr = node;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].right == Some(curr) {
                return Ok(parent);
            }
            curr = parent;
        }
        Err(Error::NoPredecessor)
    }

    // Points the slot of `parent` that held `old` at `new`. A missing parent means `old` is the
    // root.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent_node = &mut self.arena[parent];
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    parent_node.right = new;
                }
            },
        }
    }

    /// Promotes the right child of `node` into its slot and returns the new subtree root.
    pub fn rotate_left(&mut self, node: Handle) -> Handle {
        let child = self.arena[node]
            .right
            .expect("Expected right child node to be `Some`.");
        trace!("rotating left at {:?}", node);
        let parent = self.arena[node].parent;
        let inner = self.arena[child].left;

        self.arena[child].parent = parent;
        self.replace_child(parent, node, Some(child));
        self.arena[node].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }
        self.arena[child].left = Some(node);
        self.arena[node].parent = Some(child);

        node::update(&mut self.arena, node);
        node::update(&mut self.arena, child);
        child
    }

    /// Promotes the left child of `node` into its slot and returns the new subtree root.
    pub fn rotate_right(&mut self, node: Handle) -> Handle {
        let child = self.arena[node]
            .left
            .expect("Expected left child node to be `Some`.");
        trace!("rotating right at {:?}", node);
        let parent = self.arena[node].parent;
        let inner = self.arena[child].right;

        self.arena[child].parent = parent;
        self.replace_child(parent, node, Some(child));
        self.arena[node].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(node);
        }
        self.arena[child].right = Some(node);
        self.arena[node].parent = Some(child);

        node::update(&mut self.arena, node);
        node::update(&mut self.arena, child);
        child
    }

    /// Unlinks `node` from the tree and frees it.
    ///
    /// Returns the key of the removed node and the lowest node whose set of children changed.
    /// Every node whose subtree shape changed lies on the path from that node to the root.
    pub fn delete(&mut self, node: Handle) -> (T, Option<Handle>) {
        let Node {
            parent,
            left,
            right,
            ..
        } = self.arena[node];

        let lowest_changed = match (left, right) {
            (Some(left), Some(right)) => {
                let successor = self.find_min(right);
                let lowest_changed = if successor == right {
                    trace!("deleting {:?}: successor is the right child", node);
                    successor
                } else {
                    trace!("deleting {:?}: splicing out deeper successor", node);
                    let successor_parent = self.arena[successor]
                        .parent
                        .expect("Expected successor to have a parent.");
                    let successor_right = self.arena[successor].right;
                    self.arena[successor_parent].left = successor_right;
                    if let Some(successor_right) = successor_right {
                        self.arena[successor_right].parent = Some(successor_parent);
                    }
                    self.arena[successor].right = Some(right);
                    self.arena[right].parent = Some(successor);
                    successor_parent
                };

                self.arena[successor].left = Some(left);
                self.arena[left].parent = Some(successor);
                self.arena[successor].parent = parent;
                self.replace_child(parent, node, Some(successor));
                Some(lowest_changed)
            },
            (child, None) | (None, child) => {
                trace!("deleting {:?}: splicing in {:?}", node, child);
                self.replace_child(parent, node, child);
                if let Some(child) = child {
                    self.arena[child].parent = parent;
                }
                parent
            },
        };

        let removed = self.arena.free(node).expect("Expected node to be allocated.");
        (removed.key, lowest_changed)
    }

    /// Structural height of the subtree rooted at `node`, ignoring cached heights.
    pub fn subtree_height(&self, node: Option<Handle>) -> i32 {
        let mut max_height = -1;
        let mut stack = Vec::new();
        if let Some(node) = node {
            stack.push((node, 0));
        }
        while let Some((curr, depth)) = stack.pop() {
            max_height = cmp::max(max_height, depth);
            let Node { left, right, .. } = self.arena[curr];
            stack.extend(left.into_iter().chain(right).map(|child| (child, depth + 1)));
        }
        max_height
    }
}

impl<T> RawTree<T>
where
    T: Ord,
{
    pub fn find(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        while let Some(node) = curr {
            curr = match key.cmp(&self.arena[node].key) {
                Ordering::Less => self.arena[node].left,
                Ordering::Greater => self.arena[node].right,
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    /// Links a new leaf holding `key` below the node it belongs under. Returns the new node and
    /// `true`, or the node already holding an equal key and `false`.
    pub fn insert(&mut self, key: T) -> (Handle, bool) {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                let new_node = self.arena.allocate(Node::new(key));
                self.root = Some(new_node);
                return (new_node, true);
            },
        };

        loop {
            let ordering = key.cmp(&self.arena[curr].key);
            let next = match ordering {
                Ordering::Less => self.arena[curr].left,
                Ordering::Greater => self.arena[curr].right,
                Ordering::Equal => return (curr, false),
            };
            match next {
                Some(next) => curr = next,
                None => {
                    let new_node = self.arena.allocate(Node::new(key));
                    self.arena[new_node].parent = Some(curr);
                    if ordering == Ordering::Less {
                        self.arena[curr].left = Some(new_node);
                    } else {
                        self.arena[curr].right = Some(new_node);
                    }
                    return (new_node, true);
                },
            }
        }
    }

    /// Node with the largest key less than or equal to `key`.
    pub fn floor(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        let mut best = None;
        while let Some(node) = curr {
            curr = match key.cmp(&self.arena[node].key) {
                Ordering::Less => self.arena[node].left,
                Ordering::Greater => {
                    best = Some(node);
                    self.arena[node].right
                },
                Ordering::Equal => return Some(node),
            };
        }
        best
    }

    /// Node with the smallest key greater than or equal to `key`.
    pub fn ceil(&self, key: &T) -> Option<Handle> {
        let mut curr = self.root;
        let mut best = None;
        while let Some(node) = curr {
            curr = match key.cmp(&self.arena[node].key) {
                Ordering::Greater => self.arena[node].right,
                Ordering::Less => {
                    best = Some(node);
                    self.arena[node].left
                },
                Ordering::Equal => return Some(node),
            };
        }
        best
    }

    /// Walks the whole tree and reports the first broken property. Cached heights and balance
    /// are only checked when `check_heights` is set.
    pub fn validate(&self, check_heights: bool) -> Result<()> {
        let violation = |violation| Err(Error::InvariantViolation(violation));
        let root = match self.root {
            Some(root) => root,
            None if self.arena.is_empty() => return Ok(()),
            None => return violation(Violation::Count),
        };
        match self.arena.get(root) {
            Some(root_node) if root_node.parent.is_none() => {},
            _ => return violation(Violation::ParentLink),
        }

        let mut count = 0;
        let mut stack: Vec<(Handle, Option<&T>, Option<&T>)> = vec![(root, None, None)];
        while let Some((curr, lower, upper)) = stack.pop() {
            count += 1;
            if count > self.arena.len() {
                return violation(Violation::Count);
            }

            let curr_node = &self.arena[curr];
            let key = &curr_node.key;
            if lower.map_or(false, |lower| lower >= key) || upper.map_or(false, |upper| upper <= key) {
                return violation(Violation::Ordering);
            }

            for child in curr_node.left.into_iter().chain(curr_node.right) {
                match self.arena.get(child) {
                    Some(child_node) if child_node.parent == Some(curr) => {},
                    _ => return violation(Violation::ParentLink),
                }
            }

            if check_heights {
                if curr_node.height != node::updated_height(&self.arena, curr) {
                    return violation(Violation::StaleHeight);
                }
                if node::balance(&self.arena, curr).abs() > 1 {
                    return violation(Violation::Unbalanced);
                }
            }

            if let Some(left) = curr_node.left {
                stack.push((left, lower, Some(key)));
            }
            if let Some(right) = curr_node.right {
                stack.push((right, Some(key), upper));
            }
        }

        if count != self.arena.len() {
            return violation(Violation::Count);
        }
        Ok(())
    }
}
