use crate::arena::Handle;
use crate::bst::balance::{Avl, Balance, Unbalanced};
use crate::bst::tree::RawTree;
use crate::error::{Error, Result};
use log::debug;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::Index;
use std::vec::Vec;

/// An ordered set of distinct keys stored in a binary search tree with parent links.
///
/// Nodes live in an arena and are addressed by `Handle`s that stay valid across rotations until
/// their key is deleted. The balancing policy `B` runs after every insert and delete: `Unbalanced`
/// gives a plain binary search tree and `Avl` keeps the heights of sibling subtrees within one of
/// each other, bounding the height of the tree by `O(log n)`.
///
/// # Examples
///
/// ```
/// use search_tree::bst::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for key in &[10, 11, 18, 6, 2] {
///     tree.insert(*key);
/// }
///
/// assert_eq!(tree.inorder(), vec![&2, &6, &10, &11, &18]);
/// assert_eq!(tree.find(&11).map(|node| tree[node]), Some(11));
/// assert_eq!(tree.min().map(|node| tree[node]), Some(2));
///
/// assert_eq!(tree.delete(&10), Some(10));
/// assert_eq!(tree.delete(&0), None);
/// assert!(tree.check_invariant());
/// ```
pub struct SearchTree<T, B = Avl> {
    tree: RawTree<T>,
    _marker: PhantomData<B>,
}

/// A binary search tree without rebalancing.
pub type Bst<T> = SearchTree<T, Unbalanced>;

/// A binary search tree kept height balanced by AVL rotations.
pub type AvlTree<T> = SearchTree<T, Avl>;

impl<T, B> SearchTree<T, B>
where
    B: Balance,
{
    /// Constructs a new, empty `SearchTree<T, B>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::Bst;
    ///
    /// let tree: Bst<u32> = Bst::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        SearchTree {
            tree: RawTree::new(),
            _marker: PhantomData,
        }
    }

    /// Constructs a new, empty `SearchTree<T, B>` whose arena can hold `capacity` nodes without
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        SearchTree {
            tree: RawTree::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.tree.root.is_none()
    }

    /// Removes every key. All handles into the tree are invalidated.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the handle of the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<Handle> {
        self.tree.root
    }

    /// Returns the key stored at `node`, or `None` if the handle was invalidated by a delete.
    pub fn key(&self, node: Handle) -> Option<&T> {
        self.tree.arena.get(node).map(|node| &node.key)
    }

    pub fn parent(&self, node: Handle) -> Option<Handle> {
        self.tree.arena.get(node).and_then(|node| node.parent)
    }

    pub fn left(&self, node: Handle) -> Option<Handle> {
        self.tree.arena.get(node).and_then(|node| node.left)
    }

    pub fn right(&self, node: Handle) -> Option<Handle> {
        self.tree.arena.get(node).and_then(|node| node.right)
    }

    /// Returns the height of the subtree rooted at `node`: `0` for a leaf.
    ///
    /// Under the `Avl` policy this is the cached height; otherwise it is measured.
    pub fn node_height(&self, node: Handle) -> Option<i32> {
        let cached = self.tree.arena.get(node)?.height;
        if B::MAINTAINS_HEIGHT {
            Some(cached)
        } else {
            Some(self.tree.subtree_height(Some(node)))
        }
    }

    /// Returns the height of the tree: `-1` if empty and `0` for a single node.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::{AvlTree, Bst};
    ///
    /// let bst: Bst<u32> = (0..7).collect();
    /// let avl: AvlTree<u32> = (0..7).collect();
    /// assert_eq!(bst.height(), 6);
    /// assert_eq!(avl.height(), 2);
    /// ```
    pub fn height(&self) -> i32 {
        self.tree.root.map_or(-1, |root| {
            self.node_height(root)
                .expect("Expected root handle to be valid.")
        })
    }

    /// Returns the node with the minimum key, or `None` if the tree is empty.
    pub fn min(&self) -> Option<Handle> {
        self.tree.root.map(|root| self.tree.find_min(root))
    }

    /// Returns the node with the maximum key, or `None` if the tree is empty.
    pub fn max(&self) -> Option<Handle> {
        self.tree.root.map(|root| self.tree.find_max(root))
    }

    /// Returns the node with the minimum key in the subtree rooted at `node`.
    pub fn subtree_min(&self, node: Handle) -> Option<Handle> {
        if !self.tree.arena.contains(node) {
            return None;
        }
        Some(self.tree.find_min(node))
    }

    /// Returns the node with the maximum key in the subtree rooted at `node`.
    pub fn subtree_max(&self, node: Handle) -> Option<Handle> {
        if !self.tree.arena.contains(node) {
            return None;
        }
        Some(self.tree.find_max(node))
    }

    /// Returns the node holding the next larger key after the key at `node`.
    ///
    /// # Errors
    ///
    /// `Error::NoSuccessor` if `node` holds the maximum key and `Error::KeyNotFound` if the handle
    /// was invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::AvlTree;
    /// use search_tree::Error;
    ///
    /// let tree: AvlTree<u32> = vec![1, 3].into_iter().collect();
    /// let min = tree.min().unwrap();
    /// let max = tree.next_larger(min).unwrap();
    /// assert_eq!(tree[max], 3);
    /// assert_eq!(tree.next_larger(max), Err(Error::NoSuccessor));
    /// ```
    pub fn next_larger(&self, node: Handle) -> Result<Handle> {
        if !self.tree.arena.contains(node) {
            return Err(Error::KeyNotFound);
        }
        self.tree.next_larger(node)
    }

    /// Returns the node holding the next smaller key before the key at `node`.
    ///
    /// # Errors
    ///
    /// `Error::NoPredecessor` if `node` holds the minimum key and `Error::KeyNotFound` if the
    /// handle was invalidated.
    pub fn next_smaller(&self, node: Handle) -> Result<Handle> {
        if !self.tree.arena.contains(node) {
            return Err(Error::KeyNotFound);
        }
        self.tree.next_smaller(node)
    }

    /// Returns a lazy iterator over the keys in ascending order.
    ///
    /// The iterator follows parent links and needs no auxiliary stack. Each call starts a fresh
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::Bst;
    ///
    /// let tree: Bst<u32> = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// assert_eq!(tree.iter().rev().next(), Some(&3));
    /// ```
    pub fn iter(&self) -> SearchTreeIter<T> {
        SearchTreeIter {
            tree: &self.tree,
            front: self.min(),
            back: self.max(),
            remaining: self.len(),
        }
    }

    /// Returns the keys in ascending order.
    pub fn inorder(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T, B> SearchTree<T, B>
where
    T: Ord,
    B: Balance,
{
    /// Inserts a key and returns the handle of the node holding it. If an equal key is already
    /// present, the tree is left untouched, `key` is dropped and the existing node is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// let node = tree.insert(1);
    /// assert_eq!(tree.insert(1), node);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> Handle {
        let (node, inserted) = self.tree.insert(key);
        if inserted {
            B::rebalance(&mut self.tree, Some(node));
        } else {
            debug!("duplicate insert resolved to existing node {:?}", node);
        }
        node
    }

    /// Deletes a key from the tree and returns it. Returns `None` if the key is not present.
    ///
    /// The handle of the deleted node is invalidated; every other handle stays valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.delete(&1), Some(1));
    /// assert_eq!(tree.delete(&1), None);
    /// ```
    pub fn delete(&mut self, key: &T) -> Option<T> {
        let node = match self.tree.find(key) {
            Some(node) => node,
            None => {
                debug!("delete of a missing key");
                return None;
            },
        };
        let (key, lowest_changed) = self.tree.delete(node);
        B::rebalance(&mut self.tree, lowest_changed);
        Some(key)
    }

    /// Returns the node holding `key`, or `None` if the key is not present.
    pub fn find(&self, key: &T) -> Option<Handle> {
        self.tree.find(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &T) -> bool {
        self.tree.find(key).is_some()
    }

    /// Returns the node holding the next larger key after `key`. Returns `Ok(None)` if `key` is
    /// not present.
    ///
    /// # Errors
    ///
    /// `Error::NoSuccessor` if `key` is the maximum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::AvlTree;
    /// use search_tree::Error;
    ///
    /// let tree: AvlTree<u32> = vec![2, 6, 10].into_iter().collect();
    /// assert_eq!(tree.successor(&6).map(|node| node.map(|node| tree[node])), Ok(Some(10)));
    /// assert_eq!(tree.successor(&16), Ok(None));
    /// assert_eq!(tree.successor(&10), Err(Error::NoSuccessor));
    /// ```
    pub fn successor(&self, key: &T) -> Result<Option<Handle>> {
        match self.tree.find(key) {
            Some(node) => self.tree.next_larger(node).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the node holding the next smaller key before `key`. Returns `Ok(None)` if `key` is
    /// not present.
    ///
    /// # Errors
    ///
    /// `Error::NoPredecessor` if `key` is the minimum key.
    pub fn predecessor(&self, key: &T) -> Result<Option<Handle>> {
        match self.tree.find(key) {
            Some(node) => self.tree.next_smaller(node).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the node holding the largest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::bst::AvlTree;
    ///
    /// let tree: AvlTree<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(tree.floor(&0), None);
    /// assert_eq!(tree.floor(&2).map(|node| tree[node]), Some(1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<Handle> {
        self.tree.floor(key)
    }

    /// Returns the node holding the smallest key greater than or equal to `key`.
    pub fn ceil(&self, key: &T) -> Option<Handle> {
        self.tree.ceil(key)
    }

    /// Verifies the ordering of keys and the consistency of parent links, and under the `Avl`
    /// policy the cached heights and the balance of every node.
    ///
    /// # Errors
    ///
    /// `Error::InvariantViolation` naming the first broken property.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate(B::MAINTAINS_HEIGHT)
    }

    /// Returns `true` if `validate` finds no broken property.
    pub fn check_invariant(&self) -> bool {
        self.validate().is_ok()
    }
}

impl<T, B> Default for SearchTree<T, B>
where
    B: Balance,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, B> Index<Handle> for SearchTree<T, B>
where
    B: Balance,
{
    type Output = T;

    fn index(&self, node: Handle) -> &Self::Output {
        self.key(node).expect("Error: handle does not refer to a node in the tree.")
    }
}

impl<T, B> fmt::Debug for SearchTree<T, B>
where
    T: fmt::Debug,
    B: Balance,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, B> Extend<T> for SearchTree<T, B>
where
    T: Ord,
    B: Balance,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T, B> FromIterator<T> for SearchTree<T, B>
where
    T: Ord,
    B: Balance,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, B> IntoIterator for SearchTree<T, B>
where
    B: Balance,
{
    type Item = T;
    type IntoIter = SearchTreeIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        SearchTreeIntoIter { tree: self.tree }
    }
}

impl<'a, T, B> IntoIterator for &'a SearchTree<T, B>
where
    T: 'a,
    B: Balance,
{
    type Item = &'a T;
    type IntoIter = SearchTreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SearchTree<T, B>`.
///
/// This iterator yields owned keys in ascending order by unlinking the extreme node at each step.
pub struct SearchTreeIntoIter<T> {
    tree: RawTree<T>,
}

impl<T> Iterator for SearchTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let min = self.tree.find_min(self.tree.root?);
        Some(self.tree.delete(min).0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<T> DoubleEndedIterator for SearchTreeIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let max = self.tree.find_max(self.tree.root?);
        Some(self.tree.delete(max).0)
    }
}

impl<T> ExactSizeIterator for SearchTreeIntoIter<T> {}

/// An iterator for `SearchTree<T, B>`.
///
/// This iterator traverses the keys in ascending order and yields immutable references.
pub struct SearchTreeIter<'a, T>
where
    T: 'a,
{
    tree: &'a RawTree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, T> Iterator for SearchTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.remaining -= 1;
        self.front = self.tree.next_larger(node).ok();
        Some(&self.tree.arena[node].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for SearchTreeIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.remaining -= 1;
        self.back = self.tree.next_smaller(node).ok();
        Some(&self.tree.arena[node].key)
    }
}

impl<'a, T> ExactSizeIterator for SearchTreeIter<'a, T> where T: 'a {}

#[cfg(test)]
mod tests {
    use super::{AvlTree, Bst};
    use crate::arena::Handle;
    use crate::error::Error;

    #[test]
    fn test_len_empty() {
        let tree: AvlTree<u32> = AvlTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
    }

    #[test]
    fn test_empty_queries() {
        let tree: Bst<u32> = Bst::new();
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        assert_eq!(tree.find(&1), None);
        assert_eq!(tree.successor(&1), Ok(None));
        assert_eq!(tree.predecessor(&1), Ok(None));
        assert!(tree.check_invariant());
    }

    #[test]
    fn test_insert() {
        let mut tree = AvlTree::new();
        let node = tree.insert(1);
        assert_eq!(tree.key(node), Some(&1));
        assert!(tree.contains(&1));
        assert_eq!(tree.node_height(node), Some(0));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = Bst::new();
        tree.insert(10);
        let node = tree.insert(6);
        assert_eq!(tree.insert(6), node);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.inorder(), vec![&6, &10]);
        assert!(tree.check_invariant());
    }

    #[test]
    fn test_handles_survive_rotation() {
        let mut tree = AvlTree::new();
        let nodes: Vec<_> = (0..16).map(|key| tree.insert(key)).collect();
        for (key, node) in nodes.into_iter().enumerate() {
            assert_eq!(tree[node], key);
        }
    }

    #[test]
    fn test_delete_invalidates_handle() {
        let mut tree = AvlTree::new();
        let node = tree.insert(1);
        tree.insert(2);
        assert_eq!(tree.delete(&1), Some(1));
        assert_eq!(tree.key(node), None);
        assert_eq!(tree.next_larger(node), Err(Error::KeyNotFound));
        assert_eq!(tree.next_smaller(node), Err(Error::KeyNotFound));
        assert_eq!(tree.node_height(node), None);
    }

    #[test]
    fn test_delete_root_of_bst() {
        let mut tree = Bst::new();
        for key in &[10, 6, 11] {
            tree.insert(*key);
        }
        assert_eq!(tree.delete(&10), Some(10));
        assert_eq!(tree.root().map(|node| tree[node]), Some(11));
        assert_eq!(tree.parent(tree.root().unwrap()), None);
        assert!(tree.check_invariant());
    }

    #[test]
    fn test_min_max() {
        let tree: AvlTree<u32> = vec![3, 1, 5].into_iter().collect();
        assert_eq!(tree.min().map(|node| tree[node]), Some(1));
        assert_eq!(tree.max().map(|node| tree[node]), Some(5));
    }

    #[test]
    fn test_subtree_min_max() {
        let tree: Bst<u32> = vec![10, 6, 2, 8, 14].into_iter().collect();
        let node = tree.find(&6).unwrap();
        assert_eq!(tree.subtree_min(node).map(|node| tree[node]), Some(2));
        assert_eq!(tree.subtree_max(node).map(|node| tree[node]), Some(8));
    }

    #[test]
    fn test_successor_predecessor() {
        let tree: AvlTree<u32> = vec![10, 11, 18, 6, 2].into_iter().collect();
        assert_eq!(tree.successor(&6).map(|node| node.map(|node| tree[node])), Ok(Some(10)));
        assert_eq!(tree.predecessor(&6).map(|node| node.map(|node| tree[node])), Ok(Some(2)));
        assert_eq!(tree.successor(&16), Ok(None));
        assert_eq!(tree.successor(&18), Err(Error::NoSuccessor));
        assert_eq!(tree.predecessor(&2), Err(Error::NoPredecessor));
    }

    #[test]
    fn test_navigation() {
        let tree: AvlTree<u32> = vec![2, 1, 3].into_iter().collect();
        let root = tree.root().unwrap();
        assert_eq!(tree.left(root).map(|node| tree[node]), Some(1));
        assert_eq!(tree.right(root).map(|node| tree[node]), Some(3));
        assert_eq!(tree.parent(tree.left(root).unwrap()), Some(root));
        assert_eq!(tree.node_height(root), Some(1));
    }

    #[test]
    fn test_floor_ceil() {
        let tree: Bst<u32> = vec![1, 3, 5].into_iter().collect();
        let key = |node: Handle| tree[node];
        assert_eq!(tree.floor(&0), None);
        assert_eq!(tree.floor(&4).map(key), Some(3));
        assert_eq!(tree.ceil(&4).map(key), Some(5));
        assert_eq!(tree.ceil(&6), None);
    }

    #[test]
    fn test_clear() {
        let mut tree: AvlTree<u32> = (0..10).collect();
        let node = tree.find(&3).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.key(node), None);
        tree.insert(1);
        assert_eq!(tree.inorder(), vec![&1]);
    }

    #[test]
    fn test_iter_both_ends() {
        let tree: AvlTree<u32> = (0..5).collect();
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_iter_restarts() {
        let tree: Bst<u32> = vec![2, 1, 3].into_iter().collect();
        assert_eq!(tree.iter().count(), 3);
        assert_eq!((&tree).into_iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    }

    #[test]
    fn test_into_iter() {
        let tree: AvlTree<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!(tree.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
        let tree: Bst<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!(tree.into_iter().rev().collect::<Vec<u32>>(), vec![5, 3, 1]);
    }

    #[test]
    fn test_debug() {
        let tree: AvlTree<u32> = vec![2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", tree), "{1, 2}");
    }
}
