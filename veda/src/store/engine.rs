//! Transaction and notification engine shared by all the stores derived from one root.
use crate::Listeners;
use std::cell::Cell;
use tracing::{trace, trace_span};

/// Transaction depth, pending flag and listeners of a store tree.
///
/// Listeners only run when the outermost transaction ends, and they run inside a transaction of
/// their own: writes they make are batched into the next pass instead of recursing into the
/// current one.
#[derive(Debug, Default)]
pub struct Engine {
    depth: Cell<usize>,
    pending: Cell<bool>,
    /// Incremented on every write, used to detect whether a transaction body wrote anything.
    writes: Cell<u64>,
    pub(crate) listeners: Listeners,
}

impl Engine {
    pub(crate) fn new() -> Engine {
        Engine::default()
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth.get()
    }

    pub(crate) fn writes(&self) -> u64 {
        self.writes.get()
    }

    /// Records a write. Listeners will run at the end of the outermost transaction.
    pub(crate) fn mark_pending(&self) {
        self.pending.set(true);
        self.writes.set(self.writes.get().wrapping_add(1));
    }

    /// Runs `m` inside a transaction, then notifies listeners if this was the outermost one.
    ///
    /// If `m` panics, the depth is restored but no listener runs.
    pub(crate) fn transaction<A>(&self, m: impl FnOnce() -> A) -> A {
        let result = {
            let _depth = Depth::enter(self);
            m()
        };
        self.notify();
        result
    }

    fn notify(&self) {
        let mut pass = 0;
        while self.depth.get() == 0 && self.pending.get() {
            self.pending.set(false);
            pass += 1;
            let _span = trace_span!("notify", pass).entered();
            trace!(listeners = self.listeners.len(), "notifying listeners");
            let _depth = Depth::enter(self);
            self.listeners.iter(|listener| listener());
        }
    }
}

/// Holds one level of transaction depth.
struct Depth<'a>(&'a Engine);

impl<'a> Depth<'a> {
    fn enter(engine: &'a Engine) -> Depth<'a> {
        engine.depth.set(engine.depth.get() + 1);
        Depth(engine)
    }
}

impl<'a> Drop for Depth<'a> {
    fn drop(&mut self) {
        self.0.depth.set(self.0.depth.get() - 1);
    }
}
