//! List model over a runtime-owned sequence.
//!
//! # Core Types
//!
//! - [`RoleListModel`]: the model views bind to
//! - [`RoleSchema`] and [`RoleRef`]: the run-time role table
//! - [`BackingSequence`]: shared handle to the runtime's item storage
//! - [`ForeignRuntime`]: what the model needs from the storage runtime
//! - [`ItemModel`] and [`ModelSignals`]: the contract views consume
//! - [`ItemData`]: values exchanged with views
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐  getter/setter  ┌───────────────┐  signals  ┌──────────┐
//! │   Runtime    │<────────────────│ RoleListModel │──────────>│   View   │
//! │ (sequence,   │  constructor,   │  (roles,      │           │          │
//! │  closures)   │  update         │   pins)       │<──────────│          │
//! └──────────────┘                 └───────────────┘   data    └──────────┘
//! ```

mod adapter;
mod native;
mod role;
mod runtime;
mod sequence;
mod traits;
mod value;

pub use adapter::{ChangeState, Operation, RoleListModel};
pub use native::NativeRuntime;
pub use role::{Role, RoleRef, RoleSchema};
pub use runtime::{
    Constructor, ConstructorOf, ForeignRuntime, Getter, GetterOf, Setter, SetterOf, UpdateFn,
};
pub use sequence::BackingSequence;
pub use traits::{ItemFlags, ItemModel, ModelSignals};
pub use value::ItemData;
