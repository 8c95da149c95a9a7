//! The boundary to the storage runtime.
//!
//! The backing sequence, role accessors, the row constructor and the update
//! callback are all objects of a separate runtime with its own garbage
//! collector. [`ForeignRuntime`] describes what the list model needs from
//! that runtime, and the handle types in this module wrap its callables
//! together with the [`RootId`] under which they must be pinned.

use std::fmt;
use std::sync::Arc;

use rolelist_core::{CallResult, Collector, RootId};

use super::sequence::BackingSequence;
use super::value::ItemData;

/// Capabilities the list model requires from a garbage-collected runtime.
///
/// Conversion between runtime values and [`ItemData`] belongs to the runtime;
/// the model only routes values between accessors and views.
pub trait ForeignRuntime: Send + Sync + 'static {
    /// Handle to one element of the backing sequence.
    type Item: Clone + Send + Sync + 'static;

    /// A value in the runtime's own representation.
    type Value: Send + 'static;

    /// The runtime's root registration capability.
    fn collector(&self) -> Arc<dyn Collector>;

    /// Generic stringification of an item, backing the implicit role.
    fn stringify(&self, item: &Self::Item) -> ItemData;

    /// Convert a runtime value into something a view can display.
    fn to_display(&self, value: Self::Value) -> ItemData;

    /// Convert a value coming from a view into the runtime's representation.
    fn from_display(&self, data: &ItemData) -> Self::Value;
}

macro_rules! foreign_fn {
    (
        $(#[$meta:meta])*
        $name:ident<$($param:ident),*> => dyn Fn($($arg:ty),*) -> $ret:ty
    ) => {
        $(#[$meta])*
        pub struct $name<$($param),*> {
            root: RootId,
            func: Arc<dyn Fn($($arg),*) -> $ret + Send + Sync>,
        }

        impl<$($param),*> $name<$($param),*> {
            /// Wrap a runtime callable registered under `root`.
            pub fn new<F>(root: RootId, func: F) -> Self
            where
                F: Fn($($arg),*) -> $ret + Send + Sync + 'static,
            {
                Self {
                    root,
                    func: Arc::new(func),
                }
            }

            /// The root this callable is pinned under.
            #[inline]
            pub fn root(&self) -> RootId {
                self.root
            }
        }

        impl<$($param),*> Clone for $name<$($param),*> {
            fn clone(&self) -> Self {
                Self {
                    root: self.root,
                    func: self.func.clone(),
                }
            }
        }

        impl<$($param),*> fmt::Debug for $name<$($param),*> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("root", &self.root)
                    .finish_non_exhaustive()
            }
        }
    };
}

foreign_fn! {
    /// Role getter: reads one field from an item.
    Getter<I, V> => dyn Fn(&I) -> CallResult<V>
}

foreign_fn! {
    /// Role setter: writes one field of the item at the given row.
    ///
    /// The row is passed in the base configured by
    /// [`ListModelConfig::setter_index_base`](crate::config::ListModelConfig).
    Setter<I, V> => dyn Fn(&BackingSequence<I>, V, usize) -> CallResult<()>
}

foreign_fn! {
    /// Row factory: builds an item from positional field values.
    ///
    /// Returning `Ok(None)` means the runtime produced no value, which the
    /// model treats like a failed call.
    Constructor<I, V> => dyn Fn(Vec<V>) -> CallResult<Option<I>>
}

foreign_fn! {
    /// Callback run after every mutation so the runtime can refresh any
    /// mirror of the sequence it keeps.
    UpdateFn<> => dyn Fn() -> CallResult<()>
}

impl<I, V> Getter<I, V> {
    pub(crate) fn call(&self, item: &I) -> CallResult<V> {
        (self.func)(item)
    }
}

impl<I, V> Setter<I, V> {
    pub(crate) fn call(&self, sequence: &BackingSequence<I>, value: V, row: usize) -> CallResult<()> {
        (self.func)(sequence, value, row)
    }
}

impl<I, V> Constructor<I, V> {
    pub(crate) fn call(&self, fields: Vec<V>) -> CallResult<Option<I>> {
        (self.func)(fields)
    }
}

impl UpdateFn {
    pub(crate) fn call(&self) -> CallResult<()> {
        (self.func)()
    }
}

/// Getter type for a runtime.
pub type GetterOf<R> = Getter<<R as ForeignRuntime>::Item, <R as ForeignRuntime>::Value>;
/// Setter type for a runtime.
pub type SetterOf<R> = Setter<<R as ForeignRuntime>::Item, <R as ForeignRuntime>::Value>;
/// Constructor type for a runtime.
pub type ConstructorOf<R> = Constructor<<R as ForeignRuntime>::Item, <R as ForeignRuntime>::Value>;
