//! Composable state containers built from lenses.
//!
//! # Lens
//! A lens is an object that represents a way to access a component of some aggregate type `S`.
//! Given a value of type `S`, a lens can read a value of type `T` out of it, and produce a new
//! `S` with that component replaced. Lenses compose: field accesses, lookups and indexing
//! operations can be chained to reach arbitrarily deep into a value
//! (e.g. `.todos[3].title`). See [`lens`] for the available combinators.
//!
//! The _lens_ term is borrowed from the concept of _functional lenses_ in some languages
//! (https://www.schoolofhaskell.com/school/to-infinity-and-beyond/pick-of-the-week/basic-lensing).
//!
//! # Store
//! A [`Store`] is a handle to a piece of state. The root store owns the value; stores derived
//! from it with [`Store::zoom`] (and friends) are views of a part of the root value, seen through
//! a lens. All stores derived from the same root share one transaction and notification engine:
//! writes made inside [`Store::transaction`] are batched and listeners registered with
//! [`Store::on`] are called once per batch.
//!
//! # Undo
//! [`Undo`] is a persistent edit history (a zipper over past and future values). It is an
//! ordinary value, so a `Store<Undo<S>>` gets undo/redo by zooming through [`Undo::now`].
extern crate self as veda;

mod data;
mod error;
pub mod lens;
pub mod listeners;
mod store;
pub mod undo;

pub use data::Data;
pub use error::LensError;
pub use lens::{Lens, LensCompose};
pub use listeners::{ListenerKey, Listeners};
pub use store::{StoreTuple, Store, Subscription};
pub use undo::Undo;

#[cfg(feature = "derive")]
pub use veda_macros::{Data, Lens};
