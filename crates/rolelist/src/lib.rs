//! rolelist - a list model with run-time roles.
//!
//! The rows of a [`RoleListModel`](model::RoleListModel) are the items of a
//! sequence owned by a separate, garbage-collected runtime. Its roles (the
//! named fields a view displays) are getter/setter pairs supplied by that
//! runtime and can be added, replaced and removed while views are attached.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rolelist::model::{ItemData, ItemModel, NativeRuntime, RoleListModel};
//!
//! let runtime = Arc::new(NativeRuntime::<ItemData>::new());
//! let model = RoleListModel::new(runtime.clone(), runtime.sequence([]), None);
//!
//! model.add_role(
//!     "value",
//!     Some(runtime.getter(|item| Ok(item.clone()))),
//!     Some(runtime.setter(|seq, value, row| {
//!         seq.set(row, value);
//!         Ok(())
//!     })),
//! )?;
//! model.set_constructor(runtime.constructor(|mut fields| Ok(fields.pop())));
//!
//! model.signals().count_changed.connect(|count| println!("{count} rows"));
//! model.append_list(vec![ItemData::Int(5)])?;
//!
//! assert_eq!(model.cell(0, "value"), ItemData::Int(5));
//! # Ok::<(), rolelist::ListModelError>(())
//! ```

pub mod config;
mod error;
pub mod model;

pub use error::{ConfigError, ListModelError, Result};

pub use rolelist_core::*;
