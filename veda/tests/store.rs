mod common;

use common::{init_tracing, Recorder};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};
use veda::{
    lens::{self, Lens},
    LensError, Store, Subscription,
};

#[derive(Clone, Debug, PartialEq, veda::Lens)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Clone, Debug, PartialEq, veda::Lens)]
struct App {
    todos: Vec<Todo>,
    filter: String,
}

fn todo(title: &str) -> Todo {
    Todo {
        title: title.to_string(),
        done: false,
    }
}

fn app() -> App {
    App {
        todos: vec![todo("milk"), todo("eggs")],
        filter: "all".to_string(),
    }
}

fn counter(store: &Store<i32>) -> (Rc<Cell<usize>>, Subscription) {
    let calls = Rc::new(Cell::new(0));
    let sub = {
        let calls = calls.clone();
        store.on(move |_| calls.set(calls.get() + 1))
    };
    (calls, sub)
}

#[test]
fn store_laws_without_listeners() {
    init_tracing();
    let store = Store::new(app());
    let filter = store.zoom(App::filter);

    assert_eq!(filter.set("done".to_string()).get(), "done");
    let current = filter.get();
    assert_eq!(filter.set(current.clone()).get(), current);
    assert_eq!(
        filter.set("a".to_string()).set("b".to_string()).get(),
        filter.set("b".to_string()).get()
    );
}

#[test]
fn store_laws_in_transactions() {
    init_tracing();
    let store = Store::new(app());
    let seen = Recorder::new();
    store.on(seen.sink());
    let title = store.zoom(App::todos).index(0).zoom(Todo::title);

    store.transaction(|| title.set("bread".to_string()));
    assert_eq!(title.get(), "bread");

    store.transaction(|| title.set(title.get()));
    assert_eq!(title.get(), "bread");

    store.transaction(|| {
        title.set("a".to_string());
        title.set("b".to_string());
    });
    assert_eq!(title.get(), "b");
    assert_eq!(seen.count(), 3);
}

#[test]
fn transaction_batches_notifications() {
    init_tracing();
    let store = Store::new(0);
    let seen = Recorder::new();
    store.on(seen.sink());

    store.transaction(|| {
        store.set(1);
        store.set(2);
    });

    assert_eq!(seen.values(), vec![2]);
}

#[test]
fn nested_transactions_coalesce() {
    init_tracing();
    let store = Store::new(0);
    let seen = Recorder::new();
    store.on(seen.sink());

    let result = store.transaction(|| {
        store.set(1);
        store.transaction(|| {
            store.modify(|v| v + 10);
        });
        assert!(seen.values().is_empty());
        "done"
    });

    assert_eq!(result, "done");
    assert_eq!(seen.values(), vec![11]);
}

#[test]
fn set_without_change_still_notifies() {
    init_tracing();
    let store = Store::new(5);
    let (calls, _sub) = counter(&store);
    store.set(5);
    assert_eq!(calls.get(), 1);
}

#[test]
fn set_if_changed_suppresses_identical_values() {
    let store = Store::new(5);
    let (calls, _sub) = counter(&store);
    assert!(!store.set_if_changed(5));
    assert!(store.set_if_changed(6));
    assert_eq!(calls.get(), 1);
}

#[test]
fn views_of_one_root_share_notifications() {
    init_tracing();
    let store = Store::new(app());
    let filter = store.zoom(App::filter);
    let todos = store.zoom(App::todos);

    let filters = Recorder::new();
    filter.on(filters.sink());
    let lengths = Rc::new(RefCell::new(Vec::new()));
    {
        let lengths = lengths.clone();
        todos.on(move |todos| lengths.borrow_mut().push(todos.len()));
    }

    store.transaction(|| {
        filter.set("active".to_string());
        todos.edit(|todos| todos.push(todo("jam")));
    });

    assert_eq!(filters.values(), vec!["active".to_string()]);
    assert_eq!(*lengths.borrow(), vec![3]);
}

#[test]
fn reentrant_set_runs_a_second_pass() {
    init_tracing();
    let store = Store::new(0);
    let seen = Recorder::new();
    {
        let store2 = store.clone();
        store.on(move |v| {
            if v == 1 {
                store2.set(2);
            }
        });
    }
    store.on(seen.sink());

    store.set(1);

    // the second listener sees the first pass after the re-entrant write
    assert_eq!(seen.values(), vec![2, 2]);
    assert_eq!(store.get(), 2);
    store.disconnect();
}

#[test]
fn listener_removed_during_pass_is_skipped() {
    init_tracing();
    let store = Store::new(0);
    let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    {
        let second = second.clone();
        store.on(move |_| {
            if let Some(sub) = second.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
    }
    let (calls, sub) = counter(&store);
    *second.borrow_mut() = Some(sub);

    store.set(1);
    store.set(2);

    assert_eq!(calls.get(), 0);
}

#[test]
fn listener_reads_current_value() {
    let store = Store::new(app());
    let first = store.zoom(App::todos).index(0).zoom(Todo::done);
    let seen = Recorder::new();
    first.on(seen.sink());

    store.transaction(|| {
        first.set(true);
        store.zoom(App::todos).index(0).zoom(Todo::done).set(false);
    });

    assert_eq!(seen.values(), vec![false]);
}

#[test]
fn disconnect_drops_listeners() {
    let store = Store::new(1);
    let (calls, _sub) = counter(&store);
    store.zoom(lens::identity()).disconnect();
    store.set(2);
    assert_eq!(calls.get(), 0);

    let (calls, _sub) = counter(&store);
    store.set(3);
    assert_eq!(calls.get(), 1);
}

#[test]
fn each_gives_one_store_per_element() {
    init_tracing();
    let store = Store::new(app());
    let todos = store.zoom(App::todos);
    let items = todos.each();
    assert_eq!(items.len(), 2);

    items[1].zoom(Todo::done).set(true);
    assert!(store.get().todos[1].done);

    todos.edit(|todos| todos.truncate(1));
    assert_eq!(
        items[1].try_get(),
        Err(LensError::OutOfRange { index: 1, len: 1 })
    );
    assert!(items[1].try_set(todo("x")).is_err());
    assert_eq!(items[0].get().title, "milk");
}

#[test]
fn stale_view_listener_is_skipped() {
    let store = Store::new(vec![1, 2, 3]);
    let last = store.index(2);
    let seen = Recorder::new();
    last.on(seen.sink());
    let all = Recorder::new();
    store.on(all.sink());

    store.set(vec![1]);

    assert!(seen.values().is_empty());
    assert_eq!(all.values(), vec![vec![1]]);
}

#[test]
fn edit_never_mutates_previous_value() {
    let store = Store::new(vec![1, 2, 3, 4]);
    let before = store.get();

    let removed: Vec<i32> = store.edit(|v| v.splice(1..3, [9]).collect());

    assert_eq!(removed, vec![2, 3]);
    assert_eq!(before, vec![1, 2, 3, 4]);
    assert_eq!(store.get(), vec![1, 9, 4]);
}

#[test]
fn keyed_store_operations() {
    init_tracing();
    let store = Store::new(BTreeMap::from([("a", 1), ("b", 2)]));
    let seen = Recorder::new();
    store.on(seen.sink());

    store.update([("a", 10), ("c", 30)]);
    assert_eq!(seen.count(), 1);
    assert_eq!(store.at("c").get(), 30);

    let b = store.key("b");
    assert_eq!(b.get(), Some(2));
    b.set(None);
    assert_eq!(store.get(), BTreeMap::from([("a", 10), ("c", 30)]));

    let picked = store.pick(["a", "b"]);
    assert_eq!(picked.get(), BTreeMap::from([("a", 10)]));
    picked.set(BTreeMap::from([("b", 20)]));
    assert_eq!(store.get(), BTreeMap::from([("b", 20), ("c", 30)]));

    assert_eq!(store.at("a").try_get(), Err(LensError::MissingKey));
}

#[test]
fn key_with_default_store() {
    let store = Store::new(BTreeMap::<&str, i32>::new());
    let count = store.zoom(lens::key("a").compose(lens::def(0)));
    assert_eq!(count.get(), 0);
    count.set(5);
    assert_eq!(store.get(), BTreeMap::from([("a", 5)]));
    count.set(0);
    assert!(store.get().is_empty());
}

#[test]
fn relabel_and_along() {
    init_tracing();
    let store = Store::new(app());
    let (calls, _sub) = {
        let calls = Rc::new(Cell::new(0));
        let calls2 = calls.clone();
        (calls, store.on(move |_| calls2.set(calls2.get() + 1)))
    };

    let pair = store.relabel((App::filter, App::todos.compose(lens::index(0)).compose(Todo::title)));
    assert_eq!(pair.get(), ("all".to_string(), "milk".to_string()));
    pair.set(("none".to_string(), "oat milk".to_string()));
    assert_eq!(store.get().filter, "none");
    assert_eq!(store.get().todos[0].title, "oat milk");
    assert_eq!(calls.get(), 1);

    let along = Store::along((store.zoom(App::filter), store.zoom(App::todos).index(1)));
    let (filter, second) = along.get();
    assert_eq!(filter, "none");
    assert_eq!(second.title, "eggs");
    along.set(("all".to_string(), todo("ham")));
    assert_eq!(store.get().todos[1].title, "ham");
    assert_eq!(calls.get(), 2);
}

#[test]
#[should_panic(expected = "same root")]
fn along_rejects_stores_of_different_roots() {
    let a = Store::new(1);
    let b = Store::new(2);
    let _ = Store::along((a, b));
}

#[test]
fn along_notifies_the_shared_root() {
    let store = Store::new((1, 2));
    let first = store.zoom(lens::from_fn(|p: &(i32, i32)| p.0, |p: (i32, i32), v| (v, p.1)));
    let second = store.zoom(lens::from_fn(|p: &(i32, i32)| p.1, |p: (i32, i32), v| (p.0, v)));
    let (calls, _sub) = counter(&second);

    Store::along((second.clone(), first)).set((20, 10));

    assert_eq!(store.get(), (10, 20));
    assert_eq!(calls.get(), 1);
}

#[test]
fn try_transaction_rolls_back_on_error() {
    init_tracing();
    let store = Store::new(vec![1, 2, 3]);
    let seen = Recorder::new();
    store.on(seen.sink());

    let result = store.try_transaction(|| {
        store.index(0).try_set(10)?;
        store.index(7).try_set(70)?;
        Ok::<_, LensError>(())
    });

    assert_eq!(result, Err(LensError::OutOfRange { index: 7, len: 3 }));
    assert_eq!(store.get(), vec![1, 2, 3]);
    assert_eq!(seen.values(), vec![vec![1, 2, 3]]);

    let ok = store.try_transaction(|| store.index(0).try_set(10).map(|_| ()));
    assert!(ok.is_ok());
    assert_eq!(store.get(), vec![10, 2, 3]);
}

#[test]
fn plain_transaction_keeps_partial_writes() {
    let store = Store::new(vec![1, 2, 3]);
    let result = store.transaction(|| -> Result<(), LensError> {
        store.index(0).try_set(10)?;
        store.index(7).try_set(70)?;
        Ok(())
    });
    assert!(result.is_err());
    assert_eq!(store.get(), vec![10, 2, 3]);
}

#[test]
fn zoomed_errors_are_lazy() {
    let store = Store::new(Vec::<i32>::new());
    let first = store.index(0);
    assert!(first.try_get().is_err());
    store.set(vec![4]);
    assert_eq!(first.get(), 4);
    assert_eq!(lens::index(0).get(&store.get()), 4);
}
