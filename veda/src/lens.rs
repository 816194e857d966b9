//! Lenses, and combinators to build new lenses from old ones.
//!
//! Every lens produced here obeys the three lens laws, for all values where its stated
//! preconditions hold:
//!
//! 1. `get(set(s, t)) == t`
//! 2. `set(s, get(s)) == s`
//! 3. `set(set(s, a), b) == set(s, b)`
//!
//! [`from_fn`] builds a lens out of two closures; it is up to the caller to make them lawful.
use crate::{Data, LensError};
use std::{marker::PhantomData, rc::Rc};

mod map;
mod record;
mod vec;

pub use map::{at, key, pick, At, Key, Keyed, Pick};
pub use record::{relabel, relabel_map, Relabel, RelabelMap};
pub use vec::{index, Index, Sequence};

/// Trait implemented by "lens" types, which act like a reified accessor for
/// some "child" part of type `T` of a "parent" value of type `S`.
///
/// Lenses are pure: `try_set` consumes the source and returns a new one, it never modifies a value
/// visible to anyone else. The target value is returned by value, so it can be synthesized on the
/// fly by the lens (see [`relabel`] or [`iso`]).
pub trait Lens<S, T> {
    /// Reads the target out of `source`.
    fn try_get(&self, source: &S) -> Result<T, LensError>;

    /// Returns `source` with its target replaced by `value`.
    fn try_set(&self, source: S, value: T) -> Result<S, LensError>;

    /// Reads the target out of `source`.
    ///
    /// # Panics
    ///
    /// If the lens is partial and does not apply to `source` (see [`index`]).
    fn get(&self, source: &S) -> T {
        match self.try_get(source) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Returns `source` with its target replaced by `value`.
    ///
    /// # Panics
    ///
    /// If the lens is partial and does not apply to `source` (see [`index`]).
    fn set(&self, source: S, value: T) -> S {
        match self.try_set(source, value) {
            Ok(source) => source,
            Err(err) => panic!("{}", err),
        }
    }

    /// Applies `f` to the target of `source`.
    fn try_modify(&self, source: S, f: impl FnOnce(T) -> T) -> Result<S, LensError>
    where
        Self: Sized,
    {
        let value = self.try_get(&source)?;
        self.try_set(source, f(value))
    }

    /// Lens composition.
    fn compose<U, K>(self, rhs: K) -> LensCompose<Self, K, T>
    where
        Self: Sized,
        K: Lens<T, U>,
    {
        LensCompose(self, rhs, PhantomData)
    }
}

impl<'a, S, T, L: Lens<S, T> + ?Sized> Lens<S, T> for &'a L {
    fn try_get(&self, source: &S) -> Result<T, LensError> {
        (**self).try_get(source)
    }

    fn try_set(&self, source: S, value: T) -> Result<S, LensError> {
        (**self).try_set(source, value)
    }
}

impl<S, T, L: Lens<S, T> + ?Sized> Lens<S, T> for Box<L> {
    fn try_get(&self, source: &S) -> Result<T, LensError> {
        (**self).try_get(source)
    }

    fn try_set(&self, source: S, value: T) -> Result<S, LensError> {
        (**self).try_set(source, value)
    }
}

impl<S, T, L: Lens<S, T> + ?Sized> Lens<S, T> for Rc<L> {
    fn try_get(&self, source: &S) -> Result<T, LensError> {
        (**self).try_get(source)
    }

    fn try_set(&self, source: S, value: T) -> Result<S, LensError> {
        (**self).try_set(source, value)
    }
}

//--------------------------------------------------------------------------------------------------

/// Identity lens.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityLens;

impl<S: Clone> Lens<S, S> for IdentityLens {
    fn try_get(&self, source: &S) -> Result<S, LensError> {
        Ok(source.clone())
    }

    fn try_set(&self, _source: S, value: S) -> Result<S, LensError> {
        Ok(value)
    }
}

pub fn identity() -> IdentityLens {
    IdentityLens
}

//--------------------------------------------------------------------------------------------------

/// Lens composition: combines `Lens<S,T>` and `Lens<T,U>` to `Lens<S,U>`.
///
/// Equivalent to applying two lenses in succession.
#[derive(Debug)]
pub struct LensCompose<K, L, B>(pub K, pub L, pub PhantomData<B>);

// #26925
impl<K: Clone, L: Clone, B> Clone for LensCompose<K, L, B> {
    fn clone(&self) -> Self {
        LensCompose(self.0.clone(), self.1.clone(), PhantomData)
    }
}

impl<K, L, A, B, C> Lens<A, C> for LensCompose<K, L, B>
where
    K: Lens<A, B>,
    L: Lens<B, C>,
{
    fn try_get(&self, source: &A) -> Result<C, LensError> {
        self.1.try_get(&self.0.try_get(source)?)
    }

    fn try_set(&self, source: A, value: C) -> Result<A, LensError> {
        let inner = self.0.try_get(&source)?;
        let inner = self.1.try_set(inner, value)?;
        self.0.try_set(source, inner)
    }
}

/// Sequential composition: `outer` then `inner`.
pub fn seq<A, B, C, K, L>(outer: K, inner: L) -> LensCompose<K, L, B>
where
    K: Lens<A, B>,
    L: Lens<B, C>,
{
    LensCompose(outer, inner, PhantomData)
}

//--------------------------------------------------------------------------------------------------

/// A lens made of a getter and a setter closure. See [`from_fn`].
#[derive(Copy, Clone)]
pub struct FnLens<G, P> {
    get: G,
    set: P,
}

impl<S, T, G, P> Lens<S, T> for FnLens<G, P>
where
    G: Fn(&S) -> T,
    P: Fn(S, T) -> S,
{
    fn try_get(&self, source: &S) -> Result<T, LensError> {
        Ok((self.get)(source))
    }

    fn try_set(&self, source: S, value: T) -> Result<S, LensError> {
        Ok((self.set)(source, value))
    }
}

/// Builds a lens from a getter and a setter.
///
/// The pair must obey the lens laws; nothing checks that it does.
pub fn from_fn<S, T, G, P>(get: G, set: P) -> FnLens<G, P>
where
    G: Fn(&S) -> T,
    P: Fn(S, T) -> S,
{
    FnLens { get, set }
}

//--------------------------------------------------------------------------------------------------

/// Lens from a type isomorphism. See [`iso`].
#[derive(Copy, Clone)]
pub struct Iso<F, G> {
    forward: F,
    backward: G,
}

impl<S, T, F, G> Lens<S, T> for Iso<F, G>
where
    F: Fn(&S) -> T,
    G: Fn(T) -> S,
{
    fn try_get(&self, source: &S) -> Result<T, LensError> {
        Ok((self.forward)(source))
    }

    fn try_set(&self, _source: S, value: T) -> Result<S, LensError> {
        Ok((self.backward)(value))
    }
}

/// Lens from an isomorphism between `S` and `T`.
///
/// `forward` and `backward` must be inverses of each other over the values that are reachable.
pub fn iso<S, T, F, G>(forward: F, backward: G) -> Iso<F, G>
where
    F: Fn(&S) -> T,
    G: Fn(T) -> S,
{
    Iso { forward, backward }
}

//--------------------------------------------------------------------------------------------------

/// Turns an optional value into a total one. See [`def`].
#[derive(Clone, Debug)]
pub struct Def<T> {
    missing: T,
}

impl<T: Data> Lens<Option<T>, T> for Def<T> {
    fn try_get(&self, source: &Option<T>) -> Result<T, LensError> {
        Ok(source.as_ref().unwrap_or(&self.missing).clone())
    }

    fn try_set(&self, _source: Option<T>, value: T) -> Result<Option<T>, LensError> {
        if value.same(&self.missing) {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }
}

/// Maps absence to `missing`, and `missing` back to absence.
///
/// `Some(missing)` is not a value this lens can represent: it reads as `missing` and is written
/// back as `None`.
pub fn def<T: Data>(missing: T) -> Def<T> {
    Def { missing }
}
