//! Pinning of objects owned by a foreign garbage collector.
//!
//! The list adapter holds references to objects that live in a separate
//! runtime with its own collector: the backing sequence, role accessors,
//! the row constructor and the update callback. Each such reference must be
//! registered as a root while the adapter can reach it and released exactly
//! once afterwards.
//!
//! # Key Types
//!
//! - [`RootId`] - Identity of a foreign object as seen by its collector
//! - [`Collector`] - The protect/unprotect capability a runtime provides
//! - [`Pinned`] - Scoped ownership token: protects on creation, releases on drop
//! - [`RootTracker`] - Reference-counting collector with balance checks
//!
//! `Pinned<T>` is deliberately not `Clone`. Duplicating a token would
//! duplicate the release; share the pinned value through `Arc` instead.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::PinError;
use crate::logging::targets;

/// Global counter for handing out root identities.
static ROOT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a foreign object registered with a collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(u64);

impl RootId {
    /// Allocate a fresh, process-unique root identity.
    pub fn next() -> Self {
        Self(ROOT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an identity assigned by the storage runtime itself.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Root registration capability of a garbage-collected runtime.
///
/// `protect` keeps the object reachable until a matching `unprotect`.
/// Calls nest: an object protected twice must be released twice.
pub trait Collector: Send + Sync {
    /// Register `root` so the collector will not reclaim it.
    fn protect(&self, root: RootId);

    /// Drop one registration of `root`.
    fn unprotect(&self, root: RootId);
}

/// A value whose foreign counterpart is protected for as long as this token lives.
///
/// The root is protected in [`Pinned::new`] and released exactly once when
/// the token is dropped, which happens when the owning field is reassigned
/// or its owner is destroyed.
pub struct Pinned<T> {
    collector: Arc<dyn Collector>,
    root: RootId,
    value: T,
}

impl<T> Pinned<T> {
    /// Protect `root` with `collector` and take ownership of `value`.
    pub fn new(collector: Arc<dyn Collector>, root: RootId, value: T) -> Self {
        tracing::trace!(target: targets::GC, root = root.as_raw(), "pin");
        collector.protect(root);
        Self {
            collector,
            root,
            value,
        }
    }

    /// The protected root.
    #[inline]
    pub fn root(&self) -> RootId {
        self.root
    }

    /// Borrow the pinned value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for Pinned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> Drop for Pinned<T> {
    fn drop(&mut self) {
        tracing::trace!(target: targets::GC, root = self.root.as_raw(), "unpin");
        self.collector.unprotect(self.root);
    }
}

impl<T: fmt::Debug> fmt::Debug for Pinned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pinned")
            .field("root", &self.root)
            .field("value", &self.value)
            .finish()
    }
}

#[derive(Default)]
struct TrackerState {
    counts: HashMap<RootId, usize>,
    protects: u64,
    releases: u64,
    errors: Vec<PinError>,
}

/// A reference-counting [`Collector`] that keeps a ledger of registrations.
///
/// Used as the collector of in-process runtimes and to verify pin balance
/// in tests. Releasing a root that is not registered is recorded as a
/// [`PinError`] and logged at error level instead of underflowing.
#[derive(Default)]
pub struct RootTracker {
    state: Mutex<TrackerState>,
}

impl RootTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `root` currently has at least one registration.
    pub fn is_pinned(&self, root: RootId) -> bool {
        self.pin_count(root) > 0
    }

    /// Number of outstanding registrations of `root`.
    pub fn pin_count(&self, root: RootId) -> usize {
        self.state.lock().counts.get(&root).copied().unwrap_or(0)
    }

    /// Number of distinct roots currently registered.
    pub fn live_roots(&self) -> usize {
        self.state.lock().counts.len()
    }

    /// Total `protect` calls seen.
    pub fn total_protects(&self) -> u64 {
        self.state.lock().protects
    }

    /// Total successful `unprotect` calls seen.
    pub fn total_releases(&self) -> u64 {
        self.state.lock().releases
    }

    /// Drain the recorded bookkeeping errors.
    pub fn take_errors(&self) -> Vec<PinError> {
        std::mem::take(&mut self.state.lock().errors)
    }
}

impl Collector for RootTracker {
    fn protect(&self, root: RootId) {
        let mut state = self.state.lock();
        *state.counts.entry(root).or_insert(0) += 1;
        state.protects += 1;
    }

    fn unprotect(&self, root: RootId) {
        let mut state = self.state.lock();
        match state.counts.get_mut(&root) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    state.counts.remove(&root);
                }
                state.releases += 1;
            }
            None => {
                tracing::error!(
                    target: targets::GC,
                    root = root.as_raw(),
                    "release of a root that is not pinned"
                );
                state.errors.push(PinError::NotPinned(root));
            }
        }
    }
}

impl fmt::Debug for RootTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RootTracker")
            .field("live_roots", &state.counts.len())
            .field("protects", &state.protects)
            .field("releases", &state.releases)
            .finish()
    }
}

static_assertions::assert_impl_all!(RootTracker: Send, Sync);
