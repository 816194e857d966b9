//! A small todo list driven by a store with undo history.
//!
//! Run with `RUST_LOG=veda=trace` to see the notification passes.
use tracing::info;
use tracing_subscriber::EnvFilter;
use veda::{Lens, LensError, Store, Undo};

#[derive(Clone, Debug, PartialEq, Lens)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Clone, Debug, PartialEq, Lens)]
struct App {
    todos: Vec<Todo>,
    show_done: bool,
}

fn visible(app: &App) -> Vec<&str> {
    app.todos
        .iter()
        .filter(|todo| app.show_done || !todo.done)
        .map(|todo| todo.title.as_str())
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let history = Store::new(Undo::new(App {
        todos: Vec::new(),
        show_done: true,
    }));
    let app = history.now();
    let todos = app.zoom(App::todos);

    app.on(|app| info!(visible = ?visible(&app), "app changed"));

    for title in ["buy milk", "write docs", "fix bike"] {
        history.advance();
        todos.edit(|todos| {
            todos.push(Todo {
                title: title.to_string(),
                done: false,
            })
        });
    }

    history.advance();
    history.transaction(|| -> Result<(), LensError> {
        todos.index(0).zoom(Todo::done).try_set(true)?;
        app.zoom(App::show_done).try_set(false)?;
        Ok(())
    })?;

    for (i, todo) in todos.each().iter().enumerate() {
        info!(i, title = %todo.zoom(Todo::title).try_get()?, "item");
    }

    history.undo();
    info!(undone = ?visible(&app.try_get()?), can_redo = history.get().can_redo());

    // completing an item that is not there fails and leaves the list untouched
    let missing = history.try_transaction(|| todos.index(10).zoom(Todo::done).try_set(true).map(|_| ()));
    if let Err(err) = missing {
        info!(%err, "nothing to complete");
    }

    Ok(())
}
