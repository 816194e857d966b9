mod common;

use common::{init_tracing, Recorder};
use std::{collections::BTreeMap, num::NonZeroUsize};
use veda::{Store, Undo};

fn map(entries: &[(&'static str, i32)]) -> BTreeMap<&'static str, i32> {
    entries.iter().cloned().collect()
}

#[test]
fn undo_and_redo_through_a_store() {
    init_tracing();
    let store = Store::new(Undo::new(map(&[("a", 1)])));
    let now = store.now();

    store.advance_to(map(&[("a", 2)]));
    assert_eq!(now.get(), map(&[("a", 2)]));

    store.undo();
    assert_eq!(now.get(), map(&[("a", 1)]));
    assert!(store.get().can_redo());

    store.redo();
    assert_eq!(now.get(), map(&[("a", 2)]));

    // the oldest checkpoint stays put
    store.undo().undo().undo();
    assert_eq!(now.get(), map(&[("a", 1)]));
    assert!(!store.get().can_undo());
}

#[test]
fn advance_after_undo_discards_redo() {
    let store = Store::new(Undo::new(1));
    store.advance_to(2).advance_to(3);
    store.undo();
    store.advance_to(10);

    let h = store.get();
    assert!(!h.can_redo());
    assert_eq!(h.past_len(), 2);
    store.redo();
    assert_eq!(store.now().get(), 10);
    store.undo();
    assert_eq!(store.now().get(), 2);
}

#[test]
fn edits_through_now_stay_in_the_checkpoint() {
    let store = Store::new(Undo::new(map(&[("a", 1)])));
    let a = store.now().at("a");

    store.advance();
    a.set(5);
    a.modify(|v| v + 1);
    assert_eq!(a.get(), 6);
    assert_eq!(store.get().past_len(), 1);

    store.undo();
    assert_eq!(a.get(), 1);
    store.redo();
    assert_eq!(a.get(), 6);
}

#[test]
fn history_changes_notify_views() {
    init_tracing();
    let store = Store::new(Undo::new(0));
    let seen = Recorder::new();
    store.now().on(seen.sink());

    store.advance_to(1);
    store.undo();
    store.redo();
    // nothing to redo, still a write
    store.redo();

    assert_eq!(seen.values(), vec![1, 0, 1, 1]);
}

#[test]
fn checkpoints_in_one_transaction() {
    let store = Store::new(Undo::new(0));
    let seen = Recorder::new();
    store.now().on(seen.sink());

    store.transaction(|| {
        store.advance_to(1);
        store.advance_to(2);
    });

    assert_eq!(seen.values(), vec![2]);
    assert_eq!(store.get().past_len(), 2);
}

#[test]
fn limited_history_through_a_store() {
    let store = Store::new(Undo::with_limit(0, NonZeroUsize::new(3).unwrap()));
    for v in 1..=10 {
        store.advance_to(v);
    }
    assert_eq!(store.get().past_len(), 3);
    store.undo().undo().undo().undo();
    assert_eq!(store.now().get(), 7);
}
