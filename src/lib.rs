//! Ordered containers built on binary search trees with parent links.
//!
//! Nodes are owned by an arena and refer to one another through `Handle`s, so parent links never
//! form ownership cycles. `bst::Bst` is a plain binary search tree and `bst::AvlTree` rebalances
//! itself with rotations after every insert and delete.

pub mod arena;
pub mod bst;
mod error;

pub use self::arena::Handle;
pub use self::error::{Error, Result, Violation};
