use crate::arena::Handle;
use crate::bst::node;
use crate::bst::tree::RawTree;

/// A policy invoked after every structural mutation of a search tree.
///
/// `rebalance` receives the lowest node whose children changed, or `None` when the change
/// happened at the root slot itself.
pub trait Balance {
    /// `true` if the policy keeps every cached node height current.
    const MAINTAINS_HEIGHT: bool;

    fn rebalance<T>(tree: &mut RawTree<T>, node: Option<Handle>);
}

/// The plain binary search tree policy: mutations are never followed by restructuring, so the
/// height of the tree depends on the insertion order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbalanced;

impl Balance for Unbalanced {
    const MAINTAINS_HEIGHT: bool = false;

    fn rebalance<T>(_tree: &mut RawTree<T>, _node: Option<Handle>) {}
}

/// The AVL policy: after every mutation, heights are recomputed from the mutation point up to
/// the root and any node whose subtree heights differ by two is fixed with one or two rotations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

impl Balance for Avl {
    const MAINTAINS_HEIGHT: bool = true;

    fn rebalance<T>(tree: &mut RawTree<T>, node: Option<Handle>) {
        let mut curr = node;
        while let Some(node) = curr {
            node::update(&mut tree.arena, node);

            let balance = node::balance(&tree.arena, node);
            let subtree_root = if balance > 1 {
                let child = tree.arena[node]
                    .left
                    .expect("Expected left child node to be `Some`.");
                if node::balance(&tree.arena, child) < 0 {
                    tree.rotate_left(child);
                }
                tree.rotate_right(node)
            } else if balance < -1 {
                let child = tree.arena[node]
                    .right
                    .expect("Expected right child node to be `Some`.");
                if node::balance(&tree.arena, child) > 0 {
                    tree.rotate_right(child);
                }
                tree.rotate_left(node)
            } else {
                node
            };

            // the parent of the rotated subtree is the node's former parent
            curr = tree.arena[subtree_root].parent;
        }
    }
}
