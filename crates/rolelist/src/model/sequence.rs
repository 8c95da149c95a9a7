//! Shared handle to the runtime-owned backing sequence.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rolelist_core::RootId;

/// The ordered collection of item handles a list model renders.
///
/// The storage lives in the runtime; cloning a `BackingSequence` yields
/// another handle to the same storage, so the runtime can keep reading and
/// iterating it while a model is bound to it. Length-changing operations are
/// crate-private: once bound, only the model changes the row count.
pub struct BackingSequence<I> {
    root: RootId,
    items: Arc<RwLock<Vec<I>>>,
}

impl<I> Clone for BackingSequence<I> {
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            items: self.items.clone(),
        }
    }
}

impl<I: Clone> BackingSequence<I> {
    /// Wrap `items` as a sequence object registered under `root`.
    pub fn new(root: RootId, items: Vec<I>) -> Self {
        Self {
            root,
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// The root this sequence is pinned under while a model is bound to it.
    #[inline]
    pub fn root(&self) -> RootId {
        self.root
    }

    /// Current number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the sequence holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// The item handle at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<I> {
        self.items.read().get(index).cloned()
    }

    /// Copy of every item handle, in order.
    pub fn snapshot(&self) -> Vec<I> {
        self.items.read().clone()
    }

    /// Replace the item at `index`, returning the previous one.
    ///
    /// This is the write primitive setters use. Returns `None` and leaves the
    /// sequence untouched if `index` is out of range.
    pub fn set(&self, index: usize, item: I) -> Option<I> {
        let mut items = self.items.write();
        items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    /// Mutate the item at `index` in place. Returns `false` if out of range.
    pub fn update<F>(&self, index: usize, f: F) -> bool
    where
        F: FnOnce(&mut I),
    {
        match self.items.write().get_mut(index) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        }
    }

    pub(crate) fn push(&self, item: I) {
        self.items.write().push(item);
    }

    /// Remove the item at `index`, shifting later items left by one.
    pub(crate) fn remove(&self, index: usize) -> I {
        self.items.write().remove(index)
    }

    /// Move the `count` items starting at `from` so they start at `to`.
    ///
    /// Requires `from < to` and `to + count <= len`. The items between the
    /// block and its destination shift left to close the gap.
    pub(crate) fn move_block(&self, from: usize, to: usize, count: usize) {
        debug_assert!(from < to);
        self.items.write()[from..to + count].rotate_left(count);
    }

    pub(crate) fn clear(&self) {
        self.items.write().clear();
    }
}

impl<I: fmt::Debug> fmt::Debug for BackingSequence<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackingSequence")
            .field("root", &self.root)
            .field("items", &*self.items.read())
            .finish()
    }
}
