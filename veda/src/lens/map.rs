//! Map lenses: total and partial lookups by key, and key projections.
use crate::{Lens, LensError};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
};

/// Associative containers addressable by key.
///
/// Values handed to lenses are owned, so inserting or removing through this trait never affects a
/// copy of the map held elsewhere.
pub trait Keyed: Clone + Default {
    type Key: Clone;
    type Value: Clone;

    fn lookup(&self, key: &Self::Key) -> Option<&Self::Value>;
    fn insert_key(&mut self, key: Self::Key, value: Self::Value);
    fn remove_key(&mut self, key: &Self::Key);
}

impl<K: Ord + Clone, V: Clone> Keyed for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn insert_key(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

impl<K, V, H> Keyed for HashMap<K, V, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    H: BuildHasher + Clone + Default,
{
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn insert_key(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

#[cfg(feature = "imbl")]
impl<K: Ord + Clone, V: Clone> Keyed for imbl::OrdMap<K, V> {
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn insert_key(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

#[cfg(feature = "imbl")]
impl<K, V, H> Keyed for imbl::HashMap<K, V, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    H: BuildHasher + Clone + Default,
{
    type Key = K;
    type Value = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn insert_key(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn remove_key(&mut self, key: &K) {
        self.remove(key);
    }
}

//--------------------------------------------------------------------------------------------------

/// Total lens to a key the map always contains. See [`at`].
pub struct At<M: Keyed> {
    key: M::Key,
    _phantom: PhantomData<fn() -> M>,
}

// #26925
impl<M: Keyed> Clone for At<M> {
    fn clone(&self) -> Self {
        at(self.key.clone())
    }
}

impl<M: Keyed> fmt::Debug for At<M>
where
    M::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:?}]", self.key)
    }
}

impl<M: Keyed> Lens<M, M::Value> for At<M> {
    fn try_get(&self, source: &M) -> Result<M::Value, LensError> {
        source.lookup(&self.key).cloned().ok_or(LensError::MissingKey)
    }

    fn try_set(&self, mut source: M, value: M::Value) -> Result<M, LensError> {
        source.insert_key(self.key.clone(), value);
        Ok(source)
    }
}

/// Lens to the value under `key`, which the map must always contain.
///
/// Reading a map that lacks the key fails with [`LensError::MissingKey`].
pub fn at<M: Keyed>(key: M::Key) -> At<M> {
    At {
        key,
        _phantom: PhantomData,
    }
}

/// Partial-presence lens to the value under a key. See [`key`].
pub struct Key<M: Keyed> {
    key: M::Key,
    _phantom: PhantomData<fn() -> M>,
}

impl<M: Keyed> Clone for Key<M> {
    fn clone(&self) -> Self {
        key(self.key.clone())
    }
}

impl<M: Keyed> fmt::Debug for Key<M>
where
    M::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:?}]?", self.key)
    }
}

impl<M: Keyed> Lens<M, Option<M::Value>> for Key<M> {
    fn try_get(&self, source: &M) -> Result<Option<M::Value>, LensError> {
        Ok(source.lookup(&self.key).cloned())
    }

    fn try_set(&self, mut source: M, value: Option<M::Value>) -> Result<M, LensError> {
        match value {
            Some(value) => source.insert_key(self.key.clone(), value),
            None => source.remove_key(&self.key),
        }
        Ok(source)
    }
}

/// Lens to the value under `key`, if any. Setting `None` removes the key.
///
/// Compose with [`crate::lens::def`] to get a total lens with a default value.
pub fn key<M: Keyed>(key: M::Key) -> Key<M> {
    Key {
        key,
        _phantom: PhantomData,
    }
}

/// Lens to the sub-map made of a fixed set of keys. See [`pick`].
pub struct Pick<M: Keyed> {
    keys: Vec<M::Key>,
    _phantom: PhantomData<fn() -> M>,
}

impl<M: Keyed> Clone for Pick<M> {
    fn clone(&self) -> Self {
        pick(self.keys.iter().cloned())
    }
}

impl<M: Keyed> fmt::Debug for Pick<M>
where
    M::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Pick").field(&self.keys).finish()
    }
}

impl<M: Keyed> Lens<M, M> for Pick<M> {
    fn try_get(&self, source: &M) -> Result<M, LensError> {
        let mut picked = M::default();
        for k in self.keys.iter() {
            if let Some(value) = source.lookup(k) {
                picked.insert_key(k.clone(), value.clone());
            }
        }
        Ok(picked)
    }

    fn try_set(&self, mut source: M, value: M) -> Result<M, LensError> {
        for k in self.keys.iter() {
            match value.lookup(k) {
                Some(v) => source.insert_key(k.clone(), v.clone()),
                None => source.remove_key(k),
            }
        }
        Ok(source)
    }
}

/// Lens to the entries of a map whose keys are in `keys`.
///
/// Keys missing from the source are missing from the view; keys missing from a value written
/// through the lens are removed from the source. Keys of the written value that are not in `keys`
/// are ignored.
pub fn pick<M: Keyed>(keys: impl IntoIterator<Item = M::Key>) -> Pick<M> {
    Pick {
        keys: keys.into_iter().collect(),
        _phantom: PhantomData,
    }
}
