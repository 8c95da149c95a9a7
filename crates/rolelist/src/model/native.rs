//! An in-process storage runtime.
//!
//! [`NativeRuntime`] stores plain Rust values and exchanges [`ItemData`]
//! with its accessors. Its collector is a [`RootTracker`], so the pin ledger
//! of every model bound to it can be inspected. Embedders binding a real
//! scripting runtime implement [`ForeignRuntime`] themselves.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rolelist_core::{CallResult, Collector, RootId, RootTracker};

use super::runtime::{Constructor, ForeignRuntime, Getter, Setter, UpdateFn};
use super::sequence::BackingSequence;
use super::value::ItemData;

/// A runtime whose values are [`ItemData`] and whose items are `I`.
pub struct NativeRuntime<I = ItemData> {
    tracker: Arc<RootTracker>,
    _items: PhantomData<fn() -> I>,
}

impl<I> NativeRuntime<I>
where
    I: Clone + Send + Sync + fmt::Display + 'static,
{
    /// Creates a runtime with a fresh root ledger.
    pub fn new() -> Self {
        Self {
            tracker: Arc::new(RootTracker::new()),
            _items: PhantomData,
        }
    }

    /// The root ledger shared by every pin taken against this runtime.
    pub fn tracker(&self) -> &Arc<RootTracker> {
        &self.tracker
    }

    /// Allocate a sequence object holding `items`.
    pub fn sequence(&self, items: impl IntoIterator<Item = I>) -> BackingSequence<I> {
        BackingSequence::new(RootId::next(), items.into_iter().collect())
    }

    /// Allocate a getter object.
    pub fn getter<F>(&self, func: F) -> Getter<I, ItemData>
    where
        F: Fn(&I) -> CallResult<ItemData> + Send + Sync + 'static,
    {
        Getter::new(RootId::next(), func)
    }

    /// Allocate a setter object.
    pub fn setter<F>(&self, func: F) -> Setter<I, ItemData>
    where
        F: Fn(&BackingSequence<I>, ItemData, usize) -> CallResult<()> + Send + Sync + 'static,
    {
        Setter::new(RootId::next(), func)
    }

    /// Allocate a constructor object.
    pub fn constructor<F>(&self, func: F) -> Constructor<I, ItemData>
    where
        F: Fn(Vec<ItemData>) -> CallResult<Option<I>> + Send + Sync + 'static,
    {
        Constructor::new(RootId::next(), func)
    }

    /// Allocate an update callback object.
    pub fn update_fn<F>(&self, func: F) -> UpdateFn
    where
        F: Fn() -> CallResult<()> + Send + Sync + 'static,
    {
        UpdateFn::new(RootId::next(), func)
    }
}

impl<I> Default for NativeRuntime<I>
where
    I: Clone + Send + Sync + fmt::Display + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I> ForeignRuntime for NativeRuntime<I>
where
    I: Clone + Send + Sync + fmt::Display + 'static,
{
    type Item = I;
    type Value = ItemData;

    fn collector(&self) -> Arc<dyn Collector> {
        self.tracker.clone()
    }

    fn stringify(&self, item: &I) -> ItemData {
        ItemData::String(item.to_string())
    }

    fn to_display(&self, value: ItemData) -> ItemData {
        value
    }

    fn from_display(&self, data: &ItemData) -> ItemData {
        data.clone()
    }
}

impl<I> fmt::Debug for NativeRuntime<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRuntime")
            .field("tracker", &self.tracker)
            .finish()
    }
}

static_assertions::assert_impl_all!(NativeRuntime<ItemData>: Send, Sync);
