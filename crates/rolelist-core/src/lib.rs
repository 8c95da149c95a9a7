//! Core plumbing for rolelist.
//!
//! This crate provides the runtime-neutral pieces the list adapter is built on:
//!
//! - **Signal/Slot System**: Synchronous observer notifications
//! - **Pinning**: Scoped protection of objects owned by a foreign garbage collector
//! - **Thread Affinity**: Verification that UI-affine objects stay on their thread
//! - **Logging**: Tracing targets for filtering subsystem output
//!
//! # Signal/Slot Example
//!
//! ```
//! use rolelist_core::Signal;
//!
//! let count_changed = Signal::<usize>::new();
//!
//! let conn_id = count_changed.connect(|count| {
//!     println!("Count is now {}", count);
//! });
//!
//! count_changed.emit(3);
//! count_changed.disconnect(conn_id);
//! ```
//!
//! # Pinning Example
//!
//! ```
//! use std::sync::Arc;
//! use rolelist_core::gc::{Pinned, RootId, RootTracker};
//!
//! let tracker = Arc::new(RootTracker::new());
//! let root = RootId::next();
//! {
//!     let _pin = Pinned::new(tracker.clone(), root, "handle");
//!     assert!(tracker.is_pinned(root));
//! }
//! assert!(!tracker.is_pinned(root));
//! ```

mod error;
pub mod gc;
pub mod logging;
pub mod signal;
pub mod thread_check;

pub use error::{CallError, CallResult, PinError};
pub use gc::{Collector, Pinned, RootId, RootTracker};
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
