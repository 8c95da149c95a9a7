//! The role list model.
//!
//! [`RoleListModel`] presents a runtime-owned [`BackingSequence`] to a list
//! view. Its columns are roles defined at run time; its rows are the items
//! of the sequence, read live on every call.
//!
//! # Notification order
//!
//! Structural changes (append, insert, remove, move, clear) are bracketed:
//!
//! 1. `rows_about_to_be_*` fires while the sequence still has its old shape.
//! 2. The sequence is mutated and the update callback runs.
//! 3. `rows_*` fires once the sequence is consistent again.
//! 4. For changes of the row count, `count_changed` fires last.
//!
//! A mutation entry point called while another mutation is in flight, for
//! example from inside a getter or the update callback, panics.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rolelist::model::{ItemData, ItemModel, NativeRuntime, RoleListModel};
//!
//! let runtime = Arc::new(NativeRuntime::<ItemData>::new());
//! let sequence = runtime.sequence([ItemData::Int(1), ItemData::Int(2)]);
//! let model = RoleListModel::new(runtime.clone(), sequence, None);
//!
//! assert_eq!(model.row_count(), 2);
//! assert_eq!(model.roles(), vec!["string".to_string()]);
//! assert_eq!(model.data(1, 0), ItemData::from("2"));
//!
//! model.set_constructor(runtime.constructor(|mut fields| Ok(fields.pop())));
//! model.append_list(vec![ItemData::Int(3)]).unwrap();
//! assert_eq!(model.count(), 3);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rolelist_core::logging::{span_names, targets};
use rolelist_core::{Collector, Pinned, ThreadAffinity};

use crate::config::ListModelConfig;
use crate::error::{ListModelError, Result};

use super::native::NativeRuntime;
use super::role::{Accessor, Role, RoleRef, RoleSchema};
use super::runtime::{ConstructorOf, ForeignRuntime, GetterOf, SetterOf, UpdateFn};
use super::sequence::BackingSequence;
use super::traits::{ItemFlags, ItemModel, ModelSignals};
use super::value::ItemData;

/// A mutation entry point of [`RoleListModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Append,
    Insert,
    Remove,
    Move,
    Clear,
    SetCell,
    AddRole,
    SetRole,
    RemoveRole,
    SetConstructor,
}

/// Where the model is in its change-notification cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeState {
    /// No mutation in progress.
    #[default]
    Idle,
    /// Between the begin and end notifications of a structural change.
    StructuralChangeInFlight(Operation),
    /// Inside a cell write or role replacement.
    DataChangeInFlight(Operation),
}

impl ChangeState {
    /// The operation in flight, if any.
    pub fn operation(self) -> Option<Operation> {
        match self {
            ChangeState::Idle => None,
            ChangeState::StructuralChangeInFlight(op) | ChangeState::DataChangeInFlight(op) => {
                Some(op)
            }
        }
    }
}

/// Returns the state to idle when the bracket closes, including on unwind.
struct ChangeGuard<'a> {
    state: &'a Mutex<ChangeState>,
}

impl Drop for ChangeGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = ChangeState::Idle;
    }
}

#[cold]
fn reentered(attempted: Operation, current: Operation) -> ! {
    panic!("re-entrant list model mutation: {attempted:?} called while {current:?} is in flight");
}

/// Rewrite a move so the block always travels towards higher indices.
///
/// Moving `count` rows from `from` down to `to` has the same effect as moving
/// the `from - to` rows starting at `to` up past them. Returns
/// `(from, to, count)` with `from < to`, where `to` is the final start of the
/// moved block, or `None` if the blocks do not fit in `len` rows.
pub(crate) fn normalize_move(
    from: usize,
    to: usize,
    count: usize,
    len: usize,
) -> Option<(usize, usize, usize)> {
    let (from, to, count) = if to < from {
        (to, to.checked_add(count)?, from - to)
    } else {
        (from, to, count)
    };
    let end = to.checked_add(count)?;
    (end <= len).then_some((from, to, count))
}

/// A list model whose roles are defined at run time.
///
/// The model pins every runtime object it references: the backing
/// sequence, the update callback, the constructor and the accessors of
/// every role. Each pin is released when the object is replaced or the
/// model is dropped.
pub struct RoleListModel<R: ForeignRuntime> {
    runtime: Arc<R>,
    collector: Arc<dyn Collector>,
    config: ListModelConfig,
    sequence: Pinned<BackingSequence<R::Item>>,
    update: Option<Pinned<UpdateFn>>,
    constructor: RwLock<Option<Pinned<ConstructorOf<R>>>>,
    roles: RwLock<RoleSchema<R::Item, R::Value>>,
    state: Mutex<ChangeState>,
    affinity: ThreadAffinity,
    signals: ModelSignals,
}

impl<R: ForeignRuntime> RoleListModel<R> {
    /// Bind a model to `sequence` with the default configuration.
    pub fn new(runtime: Arc<R>, sequence: BackingSequence<R::Item>, update: Option<UpdateFn>) -> Self {
        Self::with_config(runtime, sequence, update, ListModelConfig::default())
    }

    /// Bind a model to `sequence`.
    ///
    /// The sequence and the update callback are pinned until the model is
    /// dropped. The model starts with the single implicit role.
    pub fn with_config(
        runtime: Arc<R>,
        sequence: BackingSequence<R::Item>,
        update: Option<UpdateFn>,
        config: ListModelConfig,
    ) -> Self {
        let collector = runtime.collector();
        let sequence = Pinned::new(collector.clone(), sequence.root(), sequence);
        let update = update.map(|update| Pinned::new(collector.clone(), update.root(), update));
        tracing::debug!(
            target: targets::MODEL,
            rows = sequence.len(),
            root = sequence.root().as_raw(),
            "list model bound"
        );
        Self {
            roles: RwLock::new(RoleSchema::new(config.default_role_name.clone())),
            runtime,
            collector,
            config,
            sequence,
            update,
            constructor: RwLock::new(None),
            state: Mutex::new(ChangeState::Idle),
            affinity: ThreadAffinity::current(),
            signals: ModelSignals::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of rows, read live from the sequence.
    pub fn count(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Role names in index order.
    pub fn roles(&self) -> Vec<String> {
        self.roles.read().names()
    }

    /// Number of roles.
    pub fn role_count(&self) -> usize {
        self.roles.read().len()
    }

    /// Index of the role called `name`.
    pub fn role_index(&self, name: &str) -> Option<usize> {
        self.roles.read().position(name)
    }

    /// Returns `true` once user-defined roles replaced the implicit one.
    pub fn has_custom_roles(&self) -> bool {
        self.roles.read().is_custom()
    }

    /// Returns `true` if append and insert can build rows.
    pub fn has_constructor(&self) -> bool {
        self.constructor.read().is_some()
    }

    /// The bound sequence.
    pub fn sequence(&self) -> &BackingSequence<R::Item> {
        self.sequence.get()
    }

    /// The storage runtime.
    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    /// The configuration the model was built with.
    pub fn config(&self) -> &ListModelConfig {
        &self.config
    }

    /// The current change-notification state.
    pub fn state(&self) -> ChangeState {
        *self.state.lock()
    }

    /// Read a cell.
    ///
    /// An out-of-range row yields `ItemData::None`. An out-of-range role
    /// index falls back to the runtime's stringification of the item. Both
    /// are logged.
    pub fn data(&self, row: usize, role: usize) -> ItemData {
        self.cell(row, RoleRef::Index(role))
    }

    /// Read a cell addressed by role index or name.
    ///
    /// An unknown role name yields `ItemData::None`.
    pub fn cell<'a>(&self, row: usize, role: impl Into<RoleRef<'a>>) -> ItemData {
        self.check_thread();
        let role = role.into();
        let Some(item) = self.sequence().get(row) else {
            self.reject(ListModelError::RowOutOfRange {
                row,
                len: self.sequence.len(),
            });
            return ItemData::None;
        };

        let accessor = {
            let roles = self.roles.read();
            match role {
                RoleRef::Index(index) => roles.accessor(index).ok_or(ListModelError::RoleOutOfRange {
                    index,
                    count: roles.len(),
                }),
                RoleRef::Name(name) => roles
                    .position(name)
                    .and_then(|index| roles.accessor(index))
                    .ok_or_else(|| ListModelError::UnknownRole(name.to_string())),
            }
        };

        match accessor {
            Ok(Accessor::Stringify) => self.runtime.stringify(&item),
            Ok(Accessor::Getter(getter)) => match getter.call(&item) {
                Ok(value) => self.runtime.to_display(value),
                Err(err) => {
                    tracing::warn!(target: targets::MODEL, row, role = %role, "getter failed: {err}");
                    ItemData::None
                }
            },
            Err(err @ ListModelError::RoleOutOfRange { .. }) => {
                self.reject(err);
                self.runtime.stringify(&item)
            }
            Err(err) => {
                self.reject(err);
                ItemData::None
            }
        }
    }

    /// Flags for `row`: valid rows are editable, others disabled.
    pub fn flags(&self, row: usize) -> ItemFlags {
        if row < self.sequence.len() {
            ItemFlags::editable()
        } else {
            ItemFlags::disabled()
        }
    }

    // =========================================================================
    // Cell writes
    // =========================================================================

    /// Write a cell through its role's setter.
    ///
    /// On success the update callback runs and `data_changed` fires for the
    /// single cell. Rejections leave the sequence untouched and emit nothing.
    pub fn set_cell<'a>(&self, row: usize, role: impl Into<RoleRef<'a>>, value: ItemData) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::SetCell);
        let role = role.into();
        let len = self.sequence.len();
        if row >= len {
            return Err(self.reject(ListModelError::RowOutOfRange { row, len }));
        }

        let resolved = {
            let roles = self.roles.read();
            match roles.resolve(role) {
                Some(index) => {
                    let name = roles.name(index).unwrap_or_default().to_string();
                    Ok((index, name, roles.setter(index)))
                }
                None => Err(Self::missing_role(role, roles.len())),
            }
        };
        let (index, name, setter) = resolved.map_err(|err| self.reject(err))?;
        let Some(setter) = setter else {
            return Err(self.reject(ListModelError::ReadOnlyRole(name)));
        };

        let _guard = self.begin(Operation::SetCell, ChangeState::DataChangeInFlight);
        let value = self.runtime.from_display(&value);
        let position = self.config.setter_index_base.apply(row);
        if let Err(source) = setter.call(self.sequence.get(), value, position) {
            return Err(self.reject(ListModelError::SetterFailed { role: name, source }));
        }
        self.run_update();
        self.signals.data_changed.emit((row, row, vec![index]));
        Ok(())
    }

    // =========================================================================
    // Structural changes
    // =========================================================================

    /// Build a row from `fields` and append it.
    ///
    /// A list is passed to the constructor as-is. A record is read in role
    /// order, skipping roles it has no field for. `ItemData::None` means no
    /// fields; any other value is a single field.
    pub fn append(&self, fields: ItemData) -> Result<()> {
        let fields = self.resolve_fields(fields);
        self.append_list(fields)
    }

    /// Build a row from positional `fields` and append it.
    pub fn append_list(&self, fields: Vec<ItemData>) -> Result<()> {
        self.check_thread();
        let _span = tracing::debug_span!(span_names::INSERT, op = "append").entered();
        let guard = self.begin(Operation::Append, ChangeState::StructuralChangeInFlight);
        let item = self.construct(fields)?;
        self.push_row(item);
        drop(guard);

        self.signals.count_changed.emit(self.sequence.len());
        Ok(())
    }

    /// Build a row from `fields` and insert it at `index`.
    ///
    /// `index` may equal the current row count, which appends.
    pub fn insert(&self, index: usize, fields: ItemData) -> Result<()> {
        let fields = self.resolve_fields(fields);
        self.insert_list(index, fields)
    }

    /// Build a row from positional `fields` and insert it at `index`.
    ///
    /// The row is appended and then moved into place, so views see an
    /// insertion at the end followed by a move.
    pub fn insert_list(&self, index: usize, fields: Vec<ItemData>) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::Insert);
        let _span = tracing::debug_span!(span_names::INSERT, op = "insert", index).entered();
        let len = self.sequence.len();
        if index > len {
            return Err(self.reject(ListModelError::RowOutOfRange { row: index, len }));
        }

        let guard = self.begin(Operation::Insert, ChangeState::StructuralChangeInFlight);
        let item = self.construct(fields)?;
        self.push_row(item);
        if index < len {
            // The new row sits at `len`; move the rows it must precede past it.
            self.move_block(index, index + 1, len - index);
        }
        drop(guard);

        self.signals.count_changed.emit(self.sequence.len());
        Ok(())
    }

    /// Remove the row at `index`.
    pub fn remove(&self, index: usize) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::Remove);
        let _span = tracing::debug_span!(span_names::REMOVE, index).entered();
        let len = self.sequence.len();
        if index >= len {
            return Err(self.reject(ListModelError::RowOutOfRange { row: index, len }));
        }

        let guard = self.begin(Operation::Remove, ChangeState::StructuralChangeInFlight);
        self.signals.emit_rows_removed(index, index, || {
            self.sequence.remove(index);
            self.run_update();
        });
        drop(guard);

        self.signals.count_changed.emit(self.sequence.len());
        Ok(())
    }

    /// Move `count` rows starting at `from` so they start at `to`.
    ///
    /// `to` is the final position of the first moved row. Moving onto the
    /// same position or moving nothing is a no-op.
    pub fn move_rows(&self, from: usize, to: usize, count: usize) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::Move);
        let _span = tracing::debug_span!(span_names::MOVE, from, to, count).entered();
        if from == to || count == 0 {
            return Ok(());
        }

        let len = self.sequence.len();
        let Some((first, dest, count)) = normalize_move(from, to, count, len) else {
            return Err(self.reject(ListModelError::InvalidMove { from, to, count, len }));
        };

        let _guard = self.begin(Operation::Move, ChangeState::StructuralChangeInFlight);
        self.move_block(first, dest, count);
        Ok(())
    }

    /// Remove every row.
    ///
    /// Clearing an empty model emits nothing.
    pub fn clear(&self) -> Result<()> {
        self.check_thread();
        let _span = tracing::debug_span!(span_names::CLEAR).entered();
        let guard = self.begin(Operation::Clear, ChangeState::StructuralChangeInFlight);
        let len = self.sequence.len();
        if len == 0 {
            return Ok(());
        }

        self.signals.emit_rows_removed(0, len - 1, || {
            self.sequence.clear();
            self.run_update();
        });
        drop(guard);

        self.signals.count_changed.emit(0);
        Ok(())
    }

    // =========================================================================
    // Roles and constructor
    // =========================================================================

    /// Append a role.
    ///
    /// The first role added discards the implicit one. A role without a
    /// setter is read-only.
    pub fn add_role(
        &self,
        name: impl Into<String>,
        getter: Option<GetterOf<R>>,
        setter: Option<SetterOf<R>>,
    ) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::AddRole);
        let name = name.into();
        let Some(getter) = getter else {
            return Err(self.reject(ListModelError::MissingGetter(name)));
        };
        if self.roles.read().position(&name).is_some() {
            return Err(self.reject(ListModelError::DuplicateRole(name)));
        }

        let role = self.pin_role(name.clone(), getter, setter);
        let index = {
            let mut roles = self.roles.write();
            if roles.enter_custom() {
                tracing::debug!(target: targets::ROLES, "implicit role discarded");
            }
            roles.push(role);
            roles.len() - 1
        };
        tracing::debug!(target: targets::ROLES, role = %name, index, "role added");

        self.signals.roles_changed.emit(());
        Ok(())
    }

    /// Replace the role at `index`.
    ///
    /// If the name is unchanged the role keeps its identity for views and
    /// `data_changed` fires over every row; otherwise `roles_changed` fires.
    /// Replacing the implicit role leaves the table with just the new role.
    pub fn set_role(
        &self,
        index: usize,
        name: impl Into<String>,
        getter: Option<GetterOf<R>>,
        setter: Option<SetterOf<R>>,
    ) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::SetRole);
        let name = name.into();
        let previous = {
            let roles = self.roles.read();
            if index >= roles.len() {
                Err(ListModelError::RoleOutOfRange {
                    index,
                    count: roles.len(),
                })
            } else if matches!(roles.position(&name), Some(other) if other != index) {
                Err(ListModelError::DuplicateRole(name.clone()))
            } else {
                Ok(roles.name(index).map(str::to_owned))
            }
        };
        let previous = previous.map_err(|err| self.reject(err))?;
        let Some(getter) = getter else {
            return Err(self.reject(ListModelError::MissingGetter(name)));
        };

        let guard = self.begin(Operation::SetRole, ChangeState::DataChangeInFlight);
        let renamed = previous.as_deref() != Some(name.as_str());
        let role = self.pin_role(name, getter, setter);
        drop(self.roles.write().replace(index, role));

        if !renamed {
            let len = self.sequence.len();
            if len > 0 {
                self.signals.data_changed.emit((0, len - 1, vec![index]));
            }
        }
        drop(guard);

        if renamed {
            self.signals.roles_changed.emit(());
        }
        Ok(())
    }

    /// Remove a role by index or name. Later roles shift down by one.
    pub fn remove_role<'a>(&self, role: impl Into<RoleRef<'a>>) -> Result<()> {
        self.check_thread();
        self.ensure_idle(Operation::RemoveRole);
        let role = role.into();
        let removed = {
            let mut roles = self.roles.write();
            match roles.resolve(role) {
                Some(index) => Ok((index, roles.remove(index))),
                None => Err(Self::missing_role(role, roles.len())),
            }
        };
        let (index, removed) = removed.map_err(|err| self.reject(err))?;
        drop(removed);
        tracing::debug!(target: targets::ROLES, role = %role, index, "role removed");

        self.signals.roles_changed.emit(());
        Ok(())
    }

    /// Set the row factory used by append and insert.
    ///
    /// The previous constructor, if any, is released.
    pub fn set_constructor(&self, constructor: ConstructorOf<R>) {
        self.check_thread();
        self.ensure_idle(Operation::SetConstructor);
        let pinned = Pinned::new(self.collector.clone(), constructor.root(), constructor);
        drop(self.constructor.write().replace(pinned));
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_thread(&self) {
        if self.config.check_thread_affinity {
            self.affinity.verify("RoleListModel");
        }
    }

    fn ensure_idle(&self, attempted: Operation) {
        let state = *self.state.lock();
        if let Some(current) = state.operation() {
            reentered(attempted, current);
        }
    }

    /// Enter the in-flight state built by `next`, panicking if another
    /// mutation is already in flight.
    fn begin(&self, attempted: Operation, next: fn(Operation) -> ChangeState) -> ChangeGuard<'_> {
        let mut state = self.state.lock();
        if let Some(current) = state.operation() {
            drop(state);
            reentered(attempted, current);
        }
        *state = next(attempted);
        ChangeGuard { state: &self.state }
    }

    fn reject(&self, err: ListModelError) -> ListModelError {
        tracing::warn!(target: targets::MODEL, "{err}");
        err
    }

    fn missing_role(role: RoleRef<'_>, count: usize) -> ListModelError {
        match role {
            RoleRef::Index(index) => ListModelError::RoleOutOfRange { index, count },
            RoleRef::Name(name) => ListModelError::UnknownRole(name.to_string()),
        }
    }

    fn pin_role(
        &self,
        name: String,
        getter: GetterOf<R>,
        setter: Option<SetterOf<R>>,
    ) -> Role<R::Item, R::Value> {
        let getter = Pinned::new(self.collector.clone(), getter.root(), getter);
        let setter = setter.map(|setter| Pinned::new(self.collector.clone(), setter.root(), setter));
        Role::new(name, getter, setter)
    }

    fn run_update(&self) {
        if let Some(update) = &self.update
            && let Err(err) = update.call()
        {
            tracing::warn!(target: targets::MODEL, "update callback failed: {err}");
        }
    }

    fn resolve_fields(&self, fields: ItemData) -> Vec<ItemData> {
        match fields {
            ItemData::None => Vec::new(),
            ItemData::List(values) => values,
            ItemData::Record(mut record) => self
                .roles
                .read()
                .names()
                .into_iter()
                .filter_map(|name| record.remove(&name))
                .collect(),
            other => vec![other],
        }
    }

    /// Run the constructor. Must be called inside a structural change.
    fn construct(&self, fields: Vec<ItemData>) -> Result<R::Item> {
        let constructor = self.constructor.read().as_ref().map(|c| c.get().clone());
        let Some(constructor) = constructor else {
            return Err(self.reject(ListModelError::NoConstructor));
        };

        let values = fields.iter().map(|field| self.runtime.from_display(field)).collect();
        let reason = match constructor.call(values) {
            Ok(Some(item)) => return Ok(item),
            Ok(None) => "constructor returned no value".to_string(),
            Err(err) => err.message().to_string(),
        };
        Err(self.reject(ListModelError::Construction { fields, reason }))
    }

    /// Append `item` inside an insertion bracket.
    fn push_row(&self, item: R::Item) {
        let row = self.sequence.len();
        self.signals.emit_rows_inserted(row, row, || {
            self.sequence.push(item);
            self.run_update();
        });
    }

    /// Move a normalized block inside a move bracket.
    fn move_block(&self, from: usize, to: usize, count: usize) {
        self.signals
            .emit_rows_moved(from, from + count - 1, to + count, || {
                self.sequence.move_block(from, to, count);
                self.run_update();
            });
    }
}

impl<R: ForeignRuntime> ItemModel for RoleListModel<R> {
    fn row_count(&self) -> usize {
        self.count()
    }

    fn data(&self, row: usize, role: usize) -> ItemData {
        self.cell(row, RoleRef::Index(role))
    }

    fn role_names(&self) -> BTreeMap<usize, String> {
        self.roles.read().name_map()
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, row: usize, value: ItemData, role: usize) -> bool {
        self.set_cell(row, RoleRef::Index(role), value).is_ok()
    }

    fn flags(&self, row: usize) -> ItemFlags {
        RoleListModel::flags(self, row)
    }
}

impl<R: ForeignRuntime> fmt::Debug for RoleListModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleListModel")
            .field("rows", &self.sequence.len())
            .field("roles", &*self.roles.read())
            .field("has_constructor", &self.has_constructor())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(RoleListModel<NativeRuntime<ItemData>>: Send, Sync, ItemModel);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Model = RoleListModel<NativeRuntime<ItemData>>;

    fn model(items: &[i64]) -> Model {
        let runtime = Arc::new(NativeRuntime::new());
        let sequence = runtime.sequence(items.iter().copied().map(ItemData::Int));
        RoleListModel::new(runtime, sequence, None)
    }

    fn ints(model: &Model) -> Vec<i64> {
        model
            .sequence()
            .snapshot()
            .iter()
            .filter_map(ItemData::as_int)
            .collect()
    }

    #[test]
    fn test_normalize_forward() {
        assert_eq!(normalize_move(0, 2, 1, 3), Some((0, 2, 1)));
        assert_eq!(normalize_move(0, 2, 2, 3), None);
    }

    #[test]
    fn test_normalize_backward_swaps_blocks() {
        // Moving row 3 to the front is moving rows 0..3 up by one.
        assert_eq!(normalize_move(3, 0, 1, 4), Some((0, 1, 3)));
        assert_eq!(normalize_move(3, 0, 2, 4), None);
        assert_eq!(normalize_move(usize::MAX, 0, usize::MAX, 4), None);
    }

    #[test]
    fn test_move_backward() {
        let model = model(&[0, 1, 2, 3, 4]);
        model.move_rows(3, 1, 2).unwrap();
        assert_eq!(ints(&model), vec![0, 3, 4, 1, 2]);
    }

    #[test]
    fn test_move_overlapping_forward() {
        let model = model(&[0, 1, 2, 3]);
        model.move_rows(0, 1, 3).unwrap();
        assert_eq!(ints(&model), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_move_signals_use_destination_before_move() {
        let model = model(&[0, 1, 2, 3, 4]);
        let moves = Arc::new(Mutex::new(Vec::new()));
        let recv = moves.clone();
        model
            .signals()
            .rows_about_to_be_moved
            .connect(move |args| recv.lock().push(*args));

        model.move_rows(0, 2, 2).unwrap();
        model.move_rows(4, 0, 1).unwrap();
        assert_eq!(*moves.lock(), vec![(0, 1, 4), (0, 3, 5)]);
    }

    #[test]
    fn test_state_returns_to_idle_after_rejection() {
        let model = model(&[1]);
        assert!(matches!(
            model.append_list(vec![ItemData::Int(2)]),
            Err(ListModelError::NoConstructor)
        ));
        assert_eq!(model.state(), ChangeState::Idle);
    }

    #[test]
    fn test_state_is_structural_during_update() {
        let runtime = Arc::new(NativeRuntime::<ItemData>::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let model: Arc<Mutex<Option<Arc<Model>>>> = Arc::new(Mutex::new(None));

        let (seen_cb, model_cb) = (seen.clone(), model.clone());
        let update = runtime.update_fn(move || {
            if let Some(model) = model_cb.lock().clone() {
                seen_cb.lock().push(model.state());
            }
            Ok(())
        });
        let bound = Arc::new(RoleListModel::new(runtime.clone(), runtime.sequence([ItemData::Int(1)]), Some(update)));
        *model.lock() = Some(bound.clone());

        bound.remove(0).unwrap();
        assert_eq!(
            *seen.lock(),
            vec![ChangeState::StructuralChangeInFlight(Operation::Remove)]
        );
        *model.lock() = None;
    }

    #[test]
    fn test_update_runs_after_every_mutation() {
        let runtime = Arc::new(NativeRuntime::<ItemData>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let update = runtime.update_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let model = RoleListModel::new(runtime.clone(), runtime.sequence([]), Some(update));
        model.set_constructor(runtime.constructor(|mut fields| Ok(fields.pop())));
        model
            .add_role(
                "value",
                Some(runtime.getter(|item| Ok(item.clone()))),
                Some(runtime.setter(|seq, value, row| {
                    seq.set(row, value);
                    Ok(())
                })),
            )
            .unwrap();

        model.append_list(vec![ItemData::Int(1)]).unwrap();
        model.insert_list(0, vec![ItemData::Int(0)]).unwrap();
        model.set_cell(1, "value", ItemData::Int(5)).unwrap();
        model.move_rows(0, 1, 1).unwrap();
        model.remove(0).unwrap();
        model.clear().unwrap();
        // insert runs it twice: once for the append, once for the move
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_one_based_setter_index() {
        let runtime = Arc::new(NativeRuntime::<ItemData>::new());
        let rows = Arc::new(Mutex::new(Vec::new()));
        let recv = rows.clone();
        let model = RoleListModel::with_config(
            runtime.clone(),
            runtime.sequence([ItemData::Int(1), ItemData::Int(2)]),
            None,
            ListModelConfig::new().with_setter_index_base(crate::config::IndexBase::One),
        );
        model
            .add_role(
                "value",
                Some(runtime.getter(|item| Ok(item.clone()))),
                Some(runtime.setter(move |seq, value, row| {
                    recv.lock().push(row);
                    seq.set(row - 1, value);
                    Ok(())
                })),
            )
            .unwrap();

        model.set_cell(1, RoleRef::Index(0), ItemData::Int(9)).unwrap();
        assert_eq!(*rows.lock(), vec![2]);
        assert_eq!(model.data(1, 0), ItemData::Int(9));
    }

    #[test]
    fn test_custom_default_role_name() {
        let runtime = Arc::new(NativeRuntime::<ItemData>::new());
        let model = RoleListModel::with_config(
            runtime.clone(),
            runtime.sequence([ItemData::from("a")]),
            None,
            ListModelConfig::new().with_default_role_name("display"),
        );
        assert_eq!(model.roles(), vec!["display".to_string()]);
        assert_eq!(model.cell(0, "display"), ItemData::from("a"));
    }

    #[test]
    fn test_flags() {
        let model = model(&[1]);
        assert!(model.flags(0).editable);
        assert!(!model.flags(1).enabled);
    }
}
