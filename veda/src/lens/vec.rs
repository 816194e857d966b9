//! Sequence lenses
use crate::{Lens, LensError};
use std::{collections::VecDeque, fmt, marker::PhantomData};

/// Ordered collections addressable by position.
pub trait Sequence: Clone {
    type Element: Clone;

    fn len(&self) -> usize;
    fn get_at(&self, index: usize) -> Option<&Self::Element>;
    fn get_at_mut(&mut self, index: usize) -> Option<&mut Self::Element>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Sequence for Vec<T> {
    type Element = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

impl<T: Clone> Sequence for VecDeque<T> {
    type Element = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

#[cfg(feature = "imbl")]
impl<T: Clone> Sequence for imbl::Vector<T> {
    type Element = T;

    fn len(&self) -> usize {
        imbl::Vector::len(self)
    }

    fn get_at(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    fn get_at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

/// A lens that looks at a particular item in a sequence.
///
/// It implements `Lens<Q, Q::Element>`, for the sequence type `Q` only.
///
/// This is a partial lens: both `try_get` and `try_set` fail with [`LensError::OutOfRange`] if the
/// sequence is too short at the time of the call.
pub struct Index<Q> {
    index: usize,
    _phantom: PhantomData<fn() -> Q>,
}

// #26925
impl<Q> Clone for Index<Q> {
    fn clone(&self) -> Self {
        Index::new(self.index)
    }
}

impl<Q> Copy for Index<Q> {}

impl<Q> fmt::Debug for Index<Q> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

impl<Q> Index<Q> {
    pub fn new(index: usize) -> Index<Q> {
        Index {
            index,
            _phantom: PhantomData,
        }
    }

    pub fn position(&self) -> usize {
        self.index
    }
}

impl<Q: Sequence> Index<Q> {
    fn out_of_range(&self, seq: &Q) -> LensError {
        LensError::OutOfRange {
            index: self.index,
            len: seq.len(),
        }
    }
}

impl<Q: Sequence> Lens<Q, Q::Element> for Index<Q> {
    fn try_get(&self, source: &Q) -> Result<Q::Element, LensError> {
        source
            .get_at(self.index)
            .cloned()
            .ok_or_else(|| self.out_of_range(source))
    }

    fn try_set(&self, mut source: Q, value: Q::Element) -> Result<Q, LensError> {
        let err = self.out_of_range(&source);
        match source.get_at_mut(self.index) {
            Some(slot) => *slot = value,
            None => return Err(err),
        }
        Ok(source)
    }
}

/// Creates a lens that looks at the element at position `i`.
pub fn index<Q: Sequence>(i: usize) -> Index<Q> {
    Index::new(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_reads_and_writes() {
        assert_eq!(index(1).try_get(&vec![1, 2, 3]), Ok(2));
        assert_eq!(index(1).set(vec![1, 2, 3], 9), vec![1, 9, 3]);
    }

    #[test]
    fn index_out_of_range() {
        assert_eq!(
            index(5).try_get(&vec![1, 2, 3]),
            Err(LensError::OutOfRange { index: 5, len: 3 })
        );
        assert_eq!(
            index(3).try_set(vec![1, 2, 3], 0),
            Err(LensError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn index_on_deque() {
        let deque: VecDeque<_> = vec!['a', 'b'].into();
        assert_eq!(index(0).set(deque, 'z'), VecDeque::from(vec!['z', 'b']));
    }

    #[test]
    fn index_composes_without_annotations() {
        let lens = index(1).compose(index(0));
        let grid = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(lens.get(&grid), 3);
        assert_eq!(lens.set(grid, 30), vec![vec![1, 2], vec![30, 4]]);
        assert_eq!(index::<Vec<i32>>(2).position(), 2);
    }
}
