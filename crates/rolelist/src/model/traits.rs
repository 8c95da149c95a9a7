//! What a list view reads through, and what it listens to.

use std::collections::BTreeMap;

use rolelist_core::Signal;

use super::value::ItemData;

/// Interaction a view may offer on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub selectable: bool,
    pub editable: bool,
    pub enabled: bool,
}

impl ItemFlags {
    /// Selectable and enabled, but not editable.
    pub fn new() -> Self {
        Self { selectable: true, editable: false, enabled: true }
    }

    /// No interaction at all. Used for rows that do not exist.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn editable() -> Self {
        Self { editable: true, ..Self::new() }
    }
}

/// A flat, positionally addressed list with named roles.
///
/// Role indices run contiguously from zero and
/// [`role_names`](ItemModel::role_names) maps each one to the name a
/// delegate binds to.
pub trait ItemModel: Send + Sync {
    fn row_count(&self) -> usize;

    /// Value of `role` at `row`, or `ItemData::None` when the row or role
    /// cannot be resolved.
    fn data(&self, row: usize, role: usize) -> ItemData;

    fn role_names(&self) -> BTreeMap<usize, String>;

    fn signals(&self) -> &ModelSignals;

    /// Write `value` into `role` at `row`. Read-only models keep the
    /// default and report `false`. Writable models emit `data_changed` on
    /// success.
    fn set_data(&self, _row: usize, _value: ItemData, _role: usize) -> bool {
        false
    }

    fn flags(&self, _row: usize) -> ItemFlags {
        ItemFlags::new()
    }

    /// Role zero of `row`, when it holds text.
    fn display_text(&self, row: usize) -> Option<String> {
        self.data(row, 0).into_string()
    }
}

/// Notifications a list model sends to its views.
///
/// Structural changes arrive as a bracket: the `about_to_be` signal fires
/// while the sequence still has its old shape, then the mutation happens,
/// then the closing signal fires against the new shape. Row ranges are
/// inclusive.
#[derive(Debug, Default)]
pub struct ModelSignals {
    /// `(first, last)` rows about to appear.
    pub rows_about_to_be_inserted: Signal<(usize, usize)>,
    /// `(first, last)` rows that appeared.
    pub rows_inserted: Signal<(usize, usize)>,
    /// `(first, last)` rows about to go.
    pub rows_about_to_be_removed: Signal<(usize, usize)>,
    /// `(first, last)` rows that went.
    pub rows_removed: Signal<(usize, usize)>,
    /// `(first, last, destination)`. The destination is in pre-move
    /// coordinates: the block lands just before the row that sat there.
    pub rows_about_to_be_moved: Signal<(usize, usize, usize)>,
    /// Same arguments as `rows_about_to_be_moved`.
    pub rows_moved: Signal<(usize, usize, usize)>,
    /// `(first, last, roles)` for cells whose values changed in place.
    pub data_changed: Signal<(usize, usize, Vec<usize>)>,
    /// The row count after it changed.
    pub count_changed: Signal<usize>,
    /// The role table changed shape or names.
    pub roles_changed: Signal<()>,
}

impl ModelSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `insert` inside an insertion bracket for `first..=last`.
    pub fn emit_rows_inserted(&self, first: usize, last: usize, insert: impl FnOnce()) {
        bracket(&self.rows_about_to_be_inserted, &self.rows_inserted, (first, last), insert);
    }

    /// Run `remove` inside a removal bracket for `first..=last`.
    pub fn emit_rows_removed(&self, first: usize, last: usize, remove: impl FnOnce()) {
        bracket(&self.rows_about_to_be_removed, &self.rows_removed, (first, last), remove);
    }

    /// Run `shift` inside a move bracket for `first..=last` towards
    /// `destination`.
    pub fn emit_rows_moved(
        &self,
        first: usize,
        last: usize,
        destination: usize,
        shift: impl FnOnce(),
    ) {
        bracket(
            &self.rows_about_to_be_moved,
            &self.rows_moved,
            (first, last, destination),
            shift,
        );
    }
}

fn bracket<A: Clone + 'static>(open: &Signal<A>, close: &Signal<A>, args: A, body: impl FnOnce()) {
    open.emit(args.clone());
    body();
    close.emit(args);
}
