//! Stores: mutable handles over an immutable value, with batched change notification.
use crate::{
    lens::{at, index, key, pick, relabel, Keyed, Relabel, Sequence},
    undo::Now,
    Data, Lens, LensError, ListenerKey, Undo,
};
use std::{
    fmt,
    rc::{Rc, Weak},
};
use tracing::{debug, trace, warn};

mod engine;
mod focus;

use self::{
    engine::Engine,
    focus::{Along, Focus, Root, Zoom},
};

//--------------------------------------------------------------------------------------------------

/// A handle to a value of type `S`.
///
/// The value lives in a root store created with [`Store::new`]. Stores derived from it
/// ([`Store::zoom`], [`Store::at`], [`Store::relabel`], ...) look at a part of the root value
/// through a lens, and share the root's transaction engine: a write through any of them notifies
/// the listeners of all of them.
///
/// Cloning a store gives another handle to the same view.
pub struct Store<S> {
    focus: Rc<dyn Focus<S>>,
    engine: Rc<Engine>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Store {
            focus: self.focus.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<S> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Store")
            .field("depth", &self.engine.depth())
            .field("listeners", &self.engine.listeners.len())
            .finish_non_exhaustive()
    }
}

/// A registered listener. See [`Store::on`].
#[derive(Clone, Debug)]
pub struct Subscription {
    engine: Weak<Engine>,
    key: ListenerKey,
}

impl Subscription {
    /// Removes the listener. Does nothing if it was already removed.
    ///
    /// A listener removed while listeners are being notified is not called in that pass if it
    /// hasn't been already.
    pub fn unsubscribe(&self) {
        if let Some(engine) = self.engine.upgrade() {
            if engine.listeners.remove(self.key) {
                debug!(key = ?self.key, "listener removed");
            }
        }
    }
}

impl<S: Clone + 'static> Store<S> {
    /// Creates a root store holding `initial`.
    pub fn new(initial: S) -> Store<S> {
        Store {
            focus: Rc::new(Root::new(initial)),
            engine: Rc::new(Engine::new()),
        }
    }

    fn derive<T>(&self, focus: impl Focus<T> + 'static) -> Store<T> {
        Store {
            focus: Rc::new(focus),
            engine: self.engine.clone(),
        }
    }

    /// Returns the current value.
    pub fn try_get(&self) -> Result<S, LensError> {
        self.focus.try_get()
    }

    /// Returns the current value.
    ///
    /// # Panics
    ///
    /// If the store was derived through a partial lens that does not apply to the current root
    /// value (e.g. an element of [`Store::each`] after the sequence shrank).
    pub fn get(&self) -> S {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Replaces the value. Listeners are notified at the end of the outermost transaction.
    ///
    /// Setting a value equal to the current one still notifies.
    pub fn try_set(&self, value: S) -> Result<&Self, LensError> {
        self.engine.transaction(|| {
            self.focus.try_set(value)?;
            trace!(depth = self.engine.depth(), "store set");
            self.engine.mark_pending();
            Ok::<_, LensError>(())
        })?;
        Ok(self)
    }

    /// Replaces the value. See [`Store::try_set`].
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Store::get`].
    pub fn set(&self, value: S) -> &Self {
        match self.try_set(value) {
            Ok(this) => this,
            Err(err) => panic!("{}", err),
        }
    }

    /// Replaces the value only if it is not [`Data::same`] as the current one.
    ///
    /// Returns whether the value was replaced.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Store::get`].
    pub fn set_if_changed(&self, value: S) -> bool
    where
        S: Data,
    {
        if self.get().same(&value) {
            trace!("store set skipped, value unchanged");
            return false;
        }
        self.set(value);
        true
    }

    /// Replaces the value with `f(current)`.
    pub fn try_modify(&self, f: impl FnOnce(S) -> S) -> Result<&Self, LensError> {
        let value = self.try_get()?;
        self.try_set(f(value))
    }

    /// Replaces the value with `f(current)`.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Store::get`].
    pub fn modify(&self, f: impl FnOnce(S) -> S) -> &Self {
        match self.try_modify(f) {
            Ok(this) => this,
            Err(err) => panic!("{}", err),
        }
    }

    /// Runs an in-place mutation on a copy of the value, then stores the copy.
    ///
    /// This is the way to use destructive methods such as `Vec::splice` or `Vec::retain`: the value
    /// previously returned by [`Store::get`] is never affected. Returns the result of `f`.
    pub fn try_edit<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, LensError> {
        let mut copy = self.try_get()?;
        let result = f(&mut copy);
        self.try_set(copy)?;
        Ok(result)
    }

    /// See [`Store::try_edit`].
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Store::get`].
    pub fn edit<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        match self.try_edit(f) {
            Ok(result) => result,
            Err(err) => panic!("{}", err),
        }
    }

    /// Batches all the writes made by `m` into a single notification.
    ///
    /// Transactions nest: listeners run once, when the outermost transaction ends, and see the
    /// final value. Writes already made are kept if `m` panics.
    pub fn transaction<A>(&self, m: impl FnOnce() -> A) -> A {
        self.engine.transaction(m)
    }

    /// Like [`Store::transaction`], but if `m` returns an error, the root value is restored to
    /// what it was when the transaction started.
    pub fn try_transaction<A, E>(&self, m: impl FnOnce() -> Result<A, E>) -> Result<A, E> {
        let restore = self.focus.snapshot();
        let writes = self.engine.writes();
        self.engine.transaction(|| {
            let result = m();
            if result.is_err() {
                debug!("transaction failed, rolling back");
                restore();
                if self.engine.writes() != writes {
                    self.engine.mark_pending();
                }
            }
            result
        })
    }

    /// Registers a listener, called with the current value at the end of every transaction that
    /// wrote to the store tree.
    ///
    /// The value is read when the listener is called, so it reflects all the writes of the
    /// transaction. A listener whose store cannot be read at that time (see [`Store::get`]) is
    /// skipped.
    pub fn on(&self, k: impl Fn(S) + 'static) -> Subscription {
        let focus = self.focus.clone();
        let key = self.engine.listeners.push(move || match focus.try_get() {
            Ok(value) => k(value),
            Err(err) => warn!(%err, "skipping listener, its store cannot be read"),
        });
        debug!(?key, "listener registered");
        Subscription {
            engine: Rc::downgrade(&self.engine),
            key,
        }
    }

    /// Removes every listener registered on this store tree.
    ///
    /// New listeners can still be registered afterwards.
    pub fn disconnect(&self) {
        debug!(listeners = self.engine.listeners.len(), "disconnecting listeners");
        self.engine.listeners.clear();
    }

    /// Returns a store looking at the part of this store's value targeted by `lens`.
    ///
    /// Errors raised by the lens surface when the derived store is read or written, not here.
    pub fn zoom<T, L>(&self, lens: L) -> Store<T>
    where
        L: Lens<S, T> + 'static,
    {
        self.derive(Zoom::new(self.focus.clone(), lens))
    }

    /// Returns a store of a tuple whose fields are read and written through `lenses`.
    ///
    /// The lenses must address disjoint parts of the value.
    pub fn relabel<T, Ls>(&self, lenses: Ls) -> Store<T>
    where
        Relabel<Ls>: Lens<S, T> + 'static,
    {
        self.zoom(relabel(lenses))
    }

    /// Combines sibling stores into one store of the tuple of their values.
    ///
    /// The stores must look at disjoint parts of the root value. Writing the combined store writes
    /// each sibling in turn, in one transaction.
    ///
    /// # Panics
    ///
    /// If the stores are not all derived from the same root.
    pub fn along<R>(stores: R) -> Store<S>
    where
        R: StoreTuple<Value = S>,
    {
        let (engine, focus) = stores.into_focus();
        Store { focus, engine }
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.engine.listeners.len()
    }
}

//--------------------------------------------------------------------------------------------------

/// Tuples of stores accepted by [`Store::along`].
pub trait StoreTuple {
    type Value;

    #[doc(hidden)]
    fn into_focus(self) -> (Rc<Engine>, Rc<dyn Focus<Self::Value>>);
}

macro_rules! impl_store_tuple {
    ($($T:ident $i:tt),+) => {
        impl<$($T: Clone + 'static),+> StoreTuple for ($(Store<$T>,)+) {
            type Value = ($($T,)+);

            fn into_focus(self) -> (Rc<Engine>, Rc<dyn Focus<Self::Value>>) {
                let engine = self.0.engine.clone();
                $(
                    assert!(
                        Rc::ptr_eq(&engine, &self.$i.engine),
                        "stores combined with `Store::along` must be derived from the same root"
                    );
                )+
                (engine, Rc::new(Along(($(self.$i.focus,)+))))
            }
        }
    };
}

impl_store_tuple!(T0 0);
impl_store_tuple!(T0 0, T1 1);
impl_store_tuple!(T0 0, T1 1, T2 2);
impl_store_tuple!(T0 0, T1 1, T2 2, T3 3);
impl_store_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4);
impl_store_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);

//--------------------------------------------------------------------------------------------------

impl<M> Store<M>
where
    M: Keyed + 'static,
    M::Key: 'static,
    M::Value: 'static,
{
    /// Store of the value under `k`, which the map must always contain.
    pub fn at(&self, k: M::Key) -> Store<M::Value> {
        self.zoom(at(k))
    }

    /// Store of the value under `k`, if any. Setting `None` removes the key.
    pub fn key(&self, k: M::Key) -> Store<Option<M::Value>> {
        self.zoom(key(k))
    }

    /// Store of the sub-map made of `keys`.
    pub fn pick(&self, keys: impl IntoIterator<Item = M::Key>) -> Store<M> {
        self.zoom(pick(keys))
    }

    /// Sets several entries in one transaction.
    pub fn try_update(
        &self,
        entries: impl IntoIterator<Item = (M::Key, M::Value)>,
    ) -> Result<&Self, LensError> {
        self.transaction(|| {
            for (k, v) in entries {
                self.at(k).try_set(v)?;
            }
            Ok::<_, LensError>(())
        })?;
        Ok(self)
    }

    /// Sets several entries in one transaction.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Store::get`].
    pub fn update(&self, entries: impl IntoIterator<Item = (M::Key, M::Value)>) -> &Self {
        match self.try_update(entries) {
            Ok(this) => this,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<Q> Store<Q>
where
    Q: Sequence + 'static,
    Q::Element: 'static,
{
    /// Store of the element at position `i`.
    ///
    /// Reading or writing it fails if the sequence is shorter than `i + 1` at that time.
    pub fn index(&self, i: usize) -> Store<Q::Element> {
        self.zoom(index(i))
    }

    /// One store per current element.
    ///
    /// The stores are not updated when the sequence changes length: a store whose position falls
    /// out of range fails on use.
    pub fn try_each(&self) -> Result<Vec<Store<Q::Element>>, LensError> {
        let len = self.try_get()?.len();
        Ok((0..len).map(|i| self.index(i)).collect())
    }

    /// See [`Store::try_each`].
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`Store::get`].
    pub fn each(&self) -> Vec<Store<Q::Element>> {
        match self.try_each() {
            Ok(stores) => stores,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<S: Clone + 'static> Store<Undo<S>> {
    /// Store of the present value of the history.
    ///
    /// Writes through it edit the current checkpoint in place.
    pub fn now(&self) -> Store<S> {
        self.zoom(Now::new())
    }

    pub fn undo(&self) -> &Self {
        self.modify(|history| history.undo())
    }

    pub fn redo(&self) -> &Self {
        self.modify(|history| history.redo())
    }

    /// Opens a new checkpoint holding a copy of the present value.
    pub fn advance(&self) -> &Self {
        self.modify(|history| history.advance())
    }

    /// Opens a new checkpoint holding `value`.
    pub fn advance_to(&self, value: S) -> &Self {
        self.modify(|history| history.advance_to(value))
    }
}
