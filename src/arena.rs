//! Slab allocator that owns the nodes of a tree.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A stable reference to an object inside an `Arena<T>`.
///
/// A handle stays valid until the object it refers to is freed. Freed slots are reused, but every
/// reuse bumps the slot's generation so an old handle never resolves to the new occupant.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
    generation: u32,
}

enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next: Option<usize> },
}

/// An allocator that stores a single type of object in one contiguous vector.
///
/// Every object is destroyed when the arena is dropped. Individual objects can be freed by handle,
/// after which their slot is threaded onto a free list and handed out again by the next
/// allocation.
///
/// # Examples
///
/// ```
/// use search_tree::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), Some(2));
/// assert_eq!(arena.get(x), None);
/// ```
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Constructs a new, empty `Arena<T>` with room for `capacity` objects before it reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::with_capacity(1024);
    /// assert!(arena.capacity() >= 1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            head: None,
            len: 0,
        }
    }

    /// Stores an object in the arena and returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied { generation: 0, value });
                Handle {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            },
            Some(index) => {
                let (generation, next) = match self.slots[index] {
                    Slot::Vacant { generation, next } => (generation.wrapping_add(1), next),
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                self.head = next;
                self.slots[index] = Slot::Occupied { generation, value };
                Handle { index, generation }
            },
        }
    }

    /// Removes an object from the arena and returns it. Returns `None` if the handle is stale or
    /// was never issued by this arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_tree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), Some(0));
    /// assert_eq!(arena.free(x), None);
    /// ```
    pub fn free(&mut self, handle: Handle) -> Option<T> {
        if !self.contains(handle) {
            return None;
        }
        let vacant = Slot::Vacant {
            generation: handle.generation,
            next: self.head,
        };
        match mem::replace(&mut self.slots[handle.index], vacant) {
            Slot::Occupied { value, .. } => {
                self.head = Some(handle.index);
                self.len -= 1;
                Some(value)
            },
            Slot::Vacant { .. } => unreachable!(),
        }
    }

    /// Returns `true` if the handle refers to a live object.
    pub fn contains(&self, handle: Handle) -> bool {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied { generation, .. }) => *generation == handle.generation,
            _ => false,
        }
    }

    /// Returns an immutable reference to an object, or `None` if the handle is stale.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.index) {
            Some(Slot::Occupied { generation, value }) if *generation == handle.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object, or `None` if the handle is stale.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.index) {
            Some(Slot::Occupied { generation, value }) if *generation == handle.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Drops every object. Previously issued handles are invalidated; the slots are kept for
    /// reuse.
    pub fn clear(&mut self) {
        let mut head = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match slot {
                Slot::Occupied { generation, .. } | Slot::Vacant { generation, .. } => *generation,
            };
            *slot = Slot::Vacant { generation, next: head };
            head = Some(index);
        }
        self.head = head;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: stale or foreign handle.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: stale or foreign handle.")
    }
}
