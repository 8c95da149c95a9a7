//! Thread affinity verification for UI-affine objects.
//!
//! The list adapter has no internal locking discipline for concurrent
//! mutation: it is designed for the single thread that drives the UI.
//! Producers on other threads must marshal onto that thread before calling
//! any mutation entry point. [`ThreadAffinity`] records the owning thread at
//! construction and lets entry points verify it.
//!
//! # Example
//!
//! ```
//! use rolelist_core::thread_check::ThreadAffinity;
//!
//! struct Counter {
//!     affinity: ThreadAffinity,
//!     value: std::cell::Cell<i32>,
//! }
//!
//! impl Counter {
//!     fn bump(&self) {
//!         self.affinity.verify("Counter::bump");
//!         self.value.set(self.value.get() + 1);
//!     }
//! }
//!
//! let counter = Counter { affinity: ThreadAffinity::current(), value: Default::default() };
//! counter.bump();
//! ```

use std::sync::Arc;
use std::thread::{self, ThreadId};

/// The thread an object belongs to.
#[derive(Debug, Clone)]
pub struct ThreadAffinity {
    owner: ThreadId,
    owner_name: Option<Arc<str>>,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        let owner = thread::current();
        Self {
            owner: owner.id(),
            owner_name: owner.name().map(Arc::from),
        }
    }

    /// The owning thread.
    #[inline]
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Returns `true` when called on the owning thread.
    #[inline]
    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Panic unless called on the owning thread. `what` names the object
    /// or operation in the panic message.
    #[inline]
    pub fn verify(&self, what: &str) {
        if !self.is_owner() {
            self.wrong_thread(what);
        }
    }

    #[cold]
    #[inline(never)]
    fn wrong_thread(&self, what: &str) -> ! {
        let current = thread::current();
        panic!(
            "{what} used on thread {:?} ({:?}) but belongs to thread {:?} ({:?}); \
             hand work to the UI thread before calling into the list model",
            current.name().unwrap_or("<unnamed>"),
            current.id(),
            self.owner_name.as_deref().unwrap_or("<unnamed>"),
            self.owner,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_creating_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_owner());
        assert_eq!(affinity.owner(), thread::current().id());
        affinity.verify("model");
    }

    #[test]
    fn test_other_thread_is_not_owner() {
        let affinity = ThreadAffinity::current();
        let on_owner = thread::spawn(move || affinity.is_owner()).join().unwrap();
        assert!(!on_owner);
    }

    #[test]
    fn test_verify_panics_off_thread() {
        let affinity = ThreadAffinity::current();
        let outcome = thread::Builder::new()
            .name("producer".into())
            .spawn(move || affinity.verify("append"))
            .unwrap()
            .join();

        let message = outcome
            .unwrap_err()
            .downcast::<String>()
            .map(|s| *s)
            .unwrap_or_default();
        assert!(message.contains("append used on thread \"producer\""), "{message}");
    }
}
