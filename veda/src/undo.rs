//! Persistent undo/redo history.
//!
//! An [`Undo`] is a zipper over a value's history: the present value, a stack of past values
//! (closest first) and a stack of undone values (most recently undone first). All the operations
//! return a new history; the stacks are shared between the old and the new one.
//!
//! Edits of the present value made through [`Undo::now`] stay in the current checkpoint. A new
//! checkpoint is opened explicitly with [`Undo::advance`], which also discards the redo stack.
use crate::{Data, Lens, LensError};
use std::{fmt, marker::PhantomData, num::NonZeroUsize, rc::Rc};

struct Node<S> {
    value: S,
    next: Option<Rc<Node<S>>>,
    len: usize,
}

/// Immutable singly-linked stack.
struct Stack<S> {
    head: Option<Rc<Node<S>>>,
}

impl<S> Clone for Stack<S> {
    fn clone(&self) -> Self {
        Stack {
            head: self.head.clone(),
        }
    }
}

impl<S> Stack<S> {
    fn empty() -> Stack<S> {
        Stack { head: None }
    }

    fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.len)
    }

    fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn push(&self, value: S) -> Stack<S> {
        let len = self.len() + 1;
        Stack {
            head: Some(Rc::new(Node {
                value,
                next: self.head.clone(),
                len,
            })),
        }
    }

    /// Returns the top value and the rest of the stack.
    fn pop(&self) -> Option<(&S, Stack<S>)> {
        self.head.as_ref().map(|node| {
            (
                &node.value,
                Stack {
                    head: node.next.clone(),
                },
            )
        })
    }

    fn iter(&self) -> impl Iterator<Item = &S> {
        let mut cur = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = cur?;
            cur = node.next.as_deref();
            Some(&node.value)
        })
    }

    fn ptr_eq(&self, other: &Stack<S>) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<S: Clone> Stack<S> {
    /// Keeps the `n` topmost values.
    fn truncate(&self, n: usize) -> Stack<S> {
        if self.len() <= n {
            return self.clone();
        }
        let kept: Vec<&S> = self.iter().take(n).collect();
        kept.into_iter()
            .rev()
            .fold(Stack::empty(), |stack, value| stack.push(value.clone()))
    }
}

impl<S> Drop for Stack<S> {
    fn drop(&mut self) {
        // unlink iteratively, long histories would overflow the stack otherwise
        let mut head = self.head.take();
        while let Some(node) = head {
            match Rc::try_unwrap(node) {
                Ok(mut node) => head = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------

/// Edit history of a value of type `S`.
///
/// With a limit, only the first `depth` entries of `past` are reachable. Entries below them are
/// cut off once the stack grows to twice the limit.
pub struct Undo<S> {
    present: S,
    past: Stack<S>,
    depth: usize,
    future: Stack<S>,
    limit: Option<NonZeroUsize>,
}

impl<S: Clone> Clone for Undo<S> {
    fn clone(&self) -> Self {
        Undo {
            present: self.present.clone(),
            past: self.past.clone(),
            depth: self.depth,
            future: self.future.clone(),
            limit: self.limit,
        }
    }
}

impl<S> Undo<S> {
    fn past(&self) -> impl Iterator<Item = &S> {
        self.past.iter().take(self.depth)
    }
}

impl<S: Clone> Undo<S> {
    /// A history with a single checkpoint and nothing to redo.
    pub fn new(value: S) -> Undo<S> {
        Undo {
            present: value,
            past: Stack::empty(),
            depth: 0,
            future: Stack::empty(),
            limit: None,
        }
    }

    /// A history that keeps at most `limit` past checkpoints. Older checkpoints are forgotten
    /// when new ones are opened.
    pub fn with_limit(value: S, limit: NonZeroUsize) -> Undo<S> {
        Undo {
            limit: Some(limit),
            ..Undo::new(value)
        }
    }

    /// Lens to the present value.
    ///
    /// Setting through it replaces the present value in place: no checkpoint is created and the
    /// redo stack is kept.
    pub fn now() -> Now<S> {
        Now::new()
    }

    pub fn present(&self) -> &S {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        self.depth > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of past checkpoints.
    pub fn past_len(&self) -> usize {
        self.depth
    }

    fn bounded(&self, depth: usize) -> usize {
        match self.limit {
            Some(limit) => depth.min(limit.get()),
            None => depth,
        }
    }

    /// Number of undone checkpoints that can be redone.
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Steps back to the previous checkpoint. Does nothing at the oldest one.
    pub fn undo(&self) -> Undo<S> {
        match self.past.pop().filter(|_| self.depth > 0) {
            Some((previous, past)) => Undo {
                present: previous.clone(),
                past,
                depth: self.depth - 1,
                future: self.future.push(self.present.clone()),
                limit: self.limit,
            },
            None => self.clone(),
        }
    }

    /// Steps forward to the last undone checkpoint. Does nothing if nothing was undone.
    pub fn redo(&self) -> Undo<S> {
        match self.future.pop() {
            Some((next, future)) => Undo {
                present: next.clone(),
                past: self.past.push(self.present.clone()),
                depth: self.bounded(self.depth + 1),
                future,
                limit: self.limit,
            },
            None => self.clone(),
        }
    }

    /// Opens a new checkpoint, starting as a copy of the present value.
    ///
    /// The redo stack is discarded.
    pub fn advance(&self) -> Undo<S> {
        let depth = self.bounded(self.depth + 1);
        let past = self.past.push(self.present.clone());
        let past = match self.limit {
            Some(limit) if past.len() >= 2 * limit.get() => past.truncate(depth),
            _ => past,
        };
        Undo {
            present: self.present.clone(),
            past,
            depth,
            future: Stack::empty(),
            limit: self.limit,
        }
    }

    /// Opens a new checkpoint holding `value`.
    pub fn advance_to(&self, value: S) -> Undo<S> {
        Now::new().set(self.advance(), value)
    }
}

impl<S: PartialEq> PartialEq for Undo<S> {
    fn eq(&self, other: &Self) -> bool {
        self.present == other.present
            && self.limit == other.limit
            && self.depth == other.depth
            && self.future.len() == other.future.len()
            && self.past().eq(other.past())
            && self.future.iter().eq(other.future.iter())
    }
}

impl<S: fmt::Debug> fmt::Debug for Undo<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Undo")
            .field("present", &self.present)
            .field("past", &self.past().collect::<Vec<_>>())
            .field("future", &self.future.iter().collect::<Vec<_>>())
            .field("limit", &self.limit)
            .finish()
    }
}

impl<S: Data> Data for Undo<S> {
    fn same(&self, other: &Self) -> bool {
        self.present.same(&other.present)
            && self.depth == other.depth
            && self.past.ptr_eq(&other.past)
            && self.future.ptr_eq(&other.future)
            && self.limit == other.limit
    }
}

/// Lens to the present value of an [`Undo`]. See [`Undo::now`].
pub struct Now<S>(PhantomData<fn() -> S>);

impl<S> Now<S> {
    pub fn new() -> Now<S> {
        Now(PhantomData)
    }
}

impl<S> Default for Now<S> {
    fn default() -> Self {
        Now::new()
    }
}

impl<S> Clone for Now<S> {
    fn clone(&self) -> Self {
        Now::new()
    }
}

impl<S> Copy for Now<S> {}

impl<S> fmt::Debug for Now<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Now")
    }
}

impl<S: Clone> Lens<Undo<S>, S> for Now<S> {
    fn try_get(&self, source: &Undo<S>) -> Result<S, LensError> {
        Ok(source.present.clone())
    }

    fn try_set(&self, mut source: Undo<S>, value: S) -> Result<Undo<S>, LensError> {
        source.present = value;
        Ok(source)
    }
}
