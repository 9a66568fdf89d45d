use std::error;
use std::fmt;
use std::result;

/// A structural property that a tree failed to satisfy during validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    /// A key is not strictly between the bounds imposed by its ancestors.
    Ordering,
    /// A child does not point back to its parent, or the root has a parent.
    ParentLink,
    /// A cached height differs from the height recomputed from the children.
    StaleHeight,
    /// The heights of the two subtrees of a node differ by more than one.
    Unbalanced,
    /// The number of reachable nodes differs from the number of allocated nodes.
    Count,
}

/// Convenience `Error` enum for `bst`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The key or handle does not refer to a node in the tree.
    KeyNotFound,
    /// The node holds the largest key, so it has no in-order successor.
    NoSuccessor,
    /// The node holds the smallest key, so it has no in-order predecessor.
    NoPredecessor,
    /// Validation found a broken structural property.
    InvariantViolation(Violation),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Violation::Ordering => "keys out of order",
            Violation::ParentLink => "inconsistent parent link",
            Violation::StaleHeight => "stale cached height",
            Violation::Unbalanced => "subtree heights differ by more than one",
            Violation::Count => "reachable node count differs from allocated count",
        };
        write!(f, "{}", message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::NoSuccessor => write!(f, "this is the largest key"),
            Error::NoPredecessor => write!(f, "this is the smallest key"),
            Error::InvariantViolation(violation) => write!(f, "invariant violated: {}", violation),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;
