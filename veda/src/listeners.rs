//! Insertion-ordered listener registry.
//!
//! Removing a listener is O(1): the callback is dropped from the slot map right away, and its key
//! is left behind in the ordering list as a tombstone. Tombstones are compacted at the start of the
//! next iteration pass.
use slotmap::SlotMap;
use std::{cell::RefCell, fmt, rc::Rc};

slotmap::new_key_type! {
    /// Handle returned by [`Listeners::push`], used to remove the listener.
    pub struct ListenerKey;
}

type Callback = Rc<dyn Fn()>;

#[derive(Default)]
struct Inner {
    callbacks: SlotMap<ListenerKey, Callback>,
    /// Registration order. May contain keys of removed listeners.
    order: Vec<ListenerKey>,
    /// Number of iteration passes in progress.
    iterating: usize,
}

/// A collection of callbacks, called in registration order.
///
/// Listeners can be removed at any time, including from within a callback while the registry is
/// being iterated: a removed listener is never called again, even if it comes later in the pass
/// that removed it. Listeners registered during a pass are not called until the next pass.
#[derive(Default)]
pub struct Listeners {
    inner: RefCell<Inner>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish_non_exhaustive()
    }
}

impl Listeners {
    pub fn new() -> Listeners {
        Listeners::default()
    }

    /// Registers a callback. Returns the key to pass to [`Listeners::remove`].
    pub fn push(&self, callback: impl Fn() + 'static) -> ListenerKey {
        let mut inner = self.inner.borrow_mut();
        let key = inner.callbacks.insert(Rc::new(callback));
        inner.order.push(key);
        key
    }

    /// Removes a callback. Returns `false` if it was already removed.
    pub fn remove(&self, key: ListenerKey) -> bool {
        self.inner.borrow_mut().callbacks.remove(key).is_some()
    }

    /// Removes all callbacks.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.callbacks.clear();
        if inner.iterating == 0 {
            inner.order.clear();
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `f` with every registered callback, in registration order.
    ///
    /// The registry is not borrowed while `f` runs, so callbacks may freely register or remove
    /// listeners.
    pub fn iter(&self, mut f: impl FnMut(&dyn Fn())) {
        let count = {
            let mut inner = self.inner.borrow_mut();
            if inner.iterating == 0 {
                let Inner { callbacks, order, .. } = &mut *inner;
                order.retain(|key| callbacks.contains_key(*key));
            }
            inner.iterating += 1;
            inner.order.len()
        };

        let _guard = IterGuard(self);
        for i in 0..count {
            let callback = {
                let inner = self.inner.borrow();
                inner.order.get(i).and_then(|key| inner.callbacks.get(*key)).cloned()
            };
            if let Some(callback) = callback {
                f(&*callback);
            }
        }
    }
}

/// Ends an iteration pass, even if a callback panics.
struct IterGuard<'a>(&'a Listeners);

impl<'a> Drop for IterGuard<'a> {
    fn drop(&mut self) {
        self.0.inner.borrow_mut().iterating -= 1;
    }
}
