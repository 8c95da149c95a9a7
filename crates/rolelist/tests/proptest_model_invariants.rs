//! Property-based invariant tests for RoleListModel.
//!
//! 1. Row count tracks the sequence, and every notification references
//!    rows that are valid at the moment it is emitted
//! 2. Role indices stay contiguous with unique names
//! 3. A move followed by its inverse restores the original order

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use rolelist::model::{ItemData, ItemModel, NativeRuntime, RoleListModel, RoleRef};

type Model = RoleListModel<NativeRuntime<ItemData>>;

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum RowOp {
    Append(i64),
    Insert(usize, i64),
    Remove(usize),
    Move(usize, usize, usize),
    Set(usize, i64),
    Clear,
}

fn arb_row_op() -> impl Strategy<Value = RowOp> {
    prop_oneof![
        4 => any::<i64>().prop_map(RowOp::Append),
        3 => (0usize..10, any::<i64>()).prop_map(|(i, v)| RowOp::Insert(i, v)),
        3 => (0usize..10).prop_map(RowOp::Remove),
        4 => (0usize..10, 0usize..10, 0usize..5).prop_map(|(f, t, c)| RowOp::Move(f, t, c)),
        2 => (0usize..10, any::<i64>()).prop_map(|(i, v)| RowOp::Set(i, v)),
        1 => Just(RowOp::Clear),
    ]
}

#[derive(Debug, Clone)]
enum RoleOp {
    Add(usize),
    Set(usize, usize),
    RemoveIndex(usize),
    RemoveName(usize),
}

fn arb_role_op() -> impl Strategy<Value = RoleOp> {
    prop_oneof![
        (0usize..6).prop_map(RoleOp::Add),
        (0usize..6, 0usize..6).prop_map(|(i, n)| RoleOp::Set(i, n)),
        (0usize..6).prop_map(RoleOp::RemoveIndex),
        (0usize..6).prop_map(RoleOp::RemoveName),
    ]
}

fn role_name(n: usize) -> String {
    format!("role{n}")
}

fn value_model(items: &[i64]) -> Model {
    let runtime = Arc::new(NativeRuntime::new());
    let model = RoleListModel::new(
        runtime.clone(),
        runtime.sequence(items.iter().copied().map(ItemData::Int)),
        None,
    );
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
    model.set_constructor(runtime.constructor(|mut fields| Ok(fields.pop())));
    model
}

fn ints(model: &Model) -> Vec<i64> {
    model
        .sequence()
        .snapshot()
        .iter()
        .filter_map(ItemData::as_int)
        .collect()
}

/// Record every notification whose indices are invalid for the live
/// sequence at emission time.
fn watch_indices(model: &Model) -> Arc<Mutex<Vec<String>>> {
    let violations = Arc::new(Mutex::new(Vec::new()));
    let signals = model.signals();

    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.rows_about_to_be_inserted.connect(move |&(first, last)| {
        if first > seq.len() || last < first {
            v.lock().push(format!("about_to_insert {first}..{last} at len {}", seq.len()));
        }
    });
    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.rows_inserted.connect(move |&(first, last)| {
        if last >= seq.len() || last < first {
            v.lock().push(format!("inserted {first}..{last} at len {}", seq.len()));
        }
    });
    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.rows_about_to_be_removed.connect(move |&(first, last)| {
        if last >= seq.len() || last < first {
            v.lock().push(format!("about_to_remove {first}..{last} at len {}", seq.len()));
        }
    });
    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.rows_removed.connect(move |&(first, last)| {
        if first > seq.len() {
            v.lock().push(format!("removed {first}..{last} at len {}", seq.len()));
        }
    });
    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.rows_about_to_be_moved.connect(move |&(first, last, dest)| {
        let len = seq.len();
        if last >= len || dest > len || (first..=last + 1).contains(&dest) {
            v.lock().push(format!("about_to_move {first}..{last} -> {dest} at len {len}"));
        }
    });
    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.data_changed.connect(move |(first, last, _)| {
        if *last >= seq.len() || last < first {
            v.lock().push(format!("data_changed {first}..{last} at len {}", seq.len()));
        }
    });
    let (seq, v) = (model.sequence().clone(), violations.clone());
    signals.count_changed.connect(move |&count| {
        if count != seq.len() {
            v.lock().push(format!("count_changed {count} at len {}", seq.len()));
        }
    });

    violations
}

/// Apply `op` to the reference vector the way the model should.
fn apply_reference(expected: &mut Vec<i64>, op: &RowOp) {
    let len = expected.len();
    match *op {
        RowOp::Append(v) => expected.push(v),
        RowOp::Insert(i, v) if i <= len => expected.insert(i, v),
        RowOp::Remove(i) if i < len => {
            expected.remove(i);
        }
        RowOp::Move(from, to, count) if from != to && count > 0 && from.max(to) + count <= len => {
            let block: Vec<i64> = expected.drain(from..from + count).collect();
            expected.splice(to..to, block);
        }
        RowOp::Set(i, v) if i < len => expected[i] = v,
        RowOp::Clear => expected.clear(),
        _ => {}
    }
}

fn apply_model(model: &Model, op: &RowOp) {
    let _ = match *op {
        RowOp::Append(v) => model.append_list(vec![ItemData::Int(v)]),
        RowOp::Insert(i, v) => model.insert_list(i, vec![ItemData::Int(v)]),
        RowOp::Remove(i) => model.remove(i),
        RowOp::Move(from, to, count) => model.move_rows(from, to, count),
        RowOp::Set(i, v) => model.set_cell(i, RoleRef::Index(0), ItemData::Int(v)),
        RowOp::Clear => model.clear(),
    };
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Count consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn count_tracks_sequence(
        initial in proptest::collection::vec(any::<i64>(), 0..6),
        ops in proptest::collection::vec(arb_row_op(), 0..40),
    ) {
        let model = value_model(&initial);
        let violations = watch_indices(&model);
        let mut expected = initial.clone();

        for op in &ops {
            apply_model(&model, op);
            apply_reference(&mut expected, op);

            prop_assert_eq!(model.row_count(), model.sequence().len());
            prop_assert_eq!(&ints(&model), &expected, "after {:?}", op);
        }
        let violations = violations.lock();
        prop_assert!(violations.is_empty(), "{:?}", *violations);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Role contiguity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn roles_stay_contiguous(ops in proptest::collection::vec(arb_role_op(), 0..30)) {
        let runtime = Arc::new(NativeRuntime::<ItemData>::new());
        let model = RoleListModel::new(runtime.clone(), runtime.sequence([ItemData::Int(1)]), None);

        for op in &ops {
            let _ = match *op {
                RoleOp::Add(n) => model.add_role(
                    role_name(n),
                    Some(runtime.getter(|item| Ok(item.clone()))),
                    None,
                ),
                RoleOp::Set(i, n) => model.set_role(
                    i,
                    role_name(n),
                    Some(runtime.getter(|item| Ok(item.clone()))),
                    None,
                ),
                RoleOp::RemoveIndex(i) => model.remove_role(RoleRef::Index(i)),
                RoleOp::RemoveName(n) => model.remove_role(role_name(n).as_str()),
            };

            let names = model.role_names();
            let keys: Vec<usize> = names.keys().copied().collect();
            prop_assert_eq!(keys, (0..model.role_count()).collect::<Vec<_>>());
            let unique: BTreeSet<&String> = names.values().collect();
            prop_assert_eq!(unique.len(), names.len());
        }

        drop(model);
        prop_assert_eq!(runtime.tracker().live_roots(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Move followed by its inverse
// ═════════════════════════════════════════════════════════════════════════

/// `(len, from, to, count)` with both blocks inside `len` rows.
fn arb_move() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..12)
        .prop_flat_map(|len| (Just(len), 1..=len))
        .prop_flat_map(|(len, count)| (Just(len), 0..=len - count, 0..=len - count, Just(count)))
}

proptest! {
    #[test]
    fn inverse_move_restores_order((len, from, to, count) in arb_move()) {
        let initial: Vec<i64> = (0..len as i64).collect();
        let model = value_model(&initial);

        model.move_rows(from, to, count).unwrap();
        prop_assert_eq!(&ints(&model)[to..to + count], &initial[from..from + count]);
        model.move_rows(to, from, count).unwrap();

        prop_assert_eq!(ints(&model), initial);
    }
}
