//! Read/write access paths from a store to the root value.
use crate::{Lens, LensError};
use std::{cell::RefCell, rc::Rc};

/// Puts the root value back to a previously saved state.
pub type Restore = Box<dyn FnOnce()>;

/// The part of the root value that a store looks at.
///
/// The root store is a [`Root`]; each derived store is a [`Zoom`] over its parent's focus, so
/// reads and writes walk up the chain of lenses to the root cell.
pub trait Focus<S> {
    fn try_get(&self) -> Result<S, LensError>;
    fn try_set(&self, value: S) -> Result<(), LensError>;
    /// Saves the whole root value.
    fn snapshot(&self) -> Restore;
}

/// The cell holding the root value.
pub struct Root<S> {
    value: Rc<RefCell<S>>,
}

impl<S> Root<S> {
    pub(crate) fn new(value: S) -> Root<S> {
        Root {
            value: Rc::new(RefCell::new(value)),
        }
    }
}

impl<S: Clone + 'static> Focus<S> for Root<S> {
    fn try_get(&self) -> Result<S, LensError> {
        Ok(self.value.borrow().clone())
    }

    fn try_set(&self, value: S) -> Result<(), LensError> {
        // the previous value is dropped after the cell is released
        let _previous = self.value.replace(value);
        Ok(())
    }

    fn snapshot(&self) -> Restore {
        let saved = self.value.borrow().clone();
        let cell = self.value.clone();
        Box::new(move || {
            cell.replace(saved);
        })
    }
}

/// A lens applied on top of another focus.
pub struct Zoom<P, L> {
    parent: Rc<dyn Focus<P>>,
    lens: L,
}

impl<P, L> Zoom<P, L> {
    pub(crate) fn new(parent: Rc<dyn Focus<P>>, lens: L) -> Zoom<P, L> {
        Zoom { parent, lens }
    }
}

impl<P, S, L: Lens<P, S>> Focus<S> for Zoom<P, L> {
    fn try_get(&self) -> Result<S, LensError> {
        self.lens.try_get(&self.parent.try_get()?)
    }

    fn try_set(&self, value: S) -> Result<(), LensError> {
        let parent = self.parent.try_get()?;
        self.parent.try_set(self.lens.try_set(parent, value)?)
    }

    fn snapshot(&self) -> Restore {
        self.parent.snapshot()
    }
}

/// Several sibling focuses seen as one focus on the tuple of their values.
pub struct Along<F>(pub(crate) F);

macro_rules! impl_along_focus {
    ($($T:ident $i:tt),+) => {
        impl<$($T),+> Focus<($($T,)+)> for Along<($(Rc<dyn Focus<$T>>,)+)> {
            fn try_get(&self) -> Result<($($T,)+), LensError> {
                Ok(($(self.0.$i.try_get()?,)+))
            }

            fn try_set(&self, value: ($($T,)+)) -> Result<(), LensError> {
                $(self.0.$i.try_set(value.$i)?;)+
                Ok(())
            }

            fn snapshot(&self) -> Restore {
                let saved: Vec<Restore> = vec![$(self.0.$i.snapshot()),+];
                Box::new(move || {
                    for restore in saved.into_iter().rev() {
                        restore();
                    }
                })
            }
        }
    };
}

impl_along_focus!(T0 0);
impl_along_focus!(T0 0, T1 1);
impl_along_focus!(T0 0, T1 1, T2 2);
impl_along_focus!(T0 0, T1 1, T2 2, T3 3);
impl_along_focus!(T0 0, T1 1, T2 2, T3 3, T4 4);
impl_along_focus!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
