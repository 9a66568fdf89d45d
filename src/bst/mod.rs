//! Binary search trees whose nodes carry parent links, with an optional AVL balancing policy
//! that keeps the heights of the two child subtrees of any node within one of each other.

mod balance;
mod node;
mod search_tree;
mod tree;

pub use self::balance::{Avl, Balance, Unbalanced};
pub use self::node::Node;
pub use self::search_tree::{AvlTree, Bst, SearchTree, SearchTreeIntoIter, SearchTreeIter};
pub use self::tree::RawTree;
