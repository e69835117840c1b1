//! Cursors: independent read positions over a shared, memoized stream.
use std::{cell::Ref, fmt, rc::Rc};

use crate::{error::StreamResult, node::CellRef, stream::Link};

/// A position in a stream.
///
/// A cursor points at a cell, not at the value inside it: whichever cursor forces
/// a cell first, every cursor on that cell reads the same memoized `Cons`, while
/// each cursor still moves on its own. Cursors are created from
/// [`Stream::begin`](crate::stream::Stream::begin) and are always bound.
///
/// A cursor keeps the root it started from alive, and with it the memoized
/// prefix of that stream, so it stays readable after the
/// [`Stream`](crate::stream::Stream) handle that created it is gone.
///
/// The panicking accessors ([`get`](Cursor::get), [`advance`](Cursor::advance)
/// and [`Iterator::next`]) treat a [`StreamError`](crate::error::StreamError) as a
/// programming error; the `try_` variants return it instead.
pub struct Cursor<T> {
    anchor: CellRef<T>,
    cell: CellRef<T>,
}

impl<T> Cursor<T> {
    pub(crate) fn new(root: CellRef<T>) -> Self {
        Self {
            cell: Rc::clone(&root),
            anchor: root,
        }
    }

    /// Whether the current element has been computed already.
    pub fn is_forced(&self) -> bool {
        self.cell.is_forced()
    }

    /// Whether both cursors stand on the same cell.
    pub fn shares_cell(&self, other: &Cursor<T>) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> Cursor<T> {
    /// Current element, forcing it on first access.
    pub fn try_get(&self) -> StreamResult<T> {
        self.cell.head()
    }

    #[doc(alias = "dereference")]
    pub fn get(&self) -> T {
        self.try_get().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Borrow the current element instead of cloning it.
    pub fn try_head(&self) -> StreamResult<Ref<'_, T>> {
        self.cell.head_ref()
    }

    pub fn head(&self) -> Ref<'_, T> {
        self.try_head().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Move to the next element. The current one is forced first if needed; the
    /// next one is not.
    pub fn try_advance(&mut self) -> StreamResult<()> {
        let next = self.cell.with_cons(|_, tail| match tail {
            Link::Owned(stream) => Ok(Rc::clone(&stream.root)),
            Link::Shared(binding) => binding.resolve(),
        })??;
        self.cell = next;
        Ok(())
    }

    pub fn advance(&mut self) {
        if let Err(err) = self.try_advance() {
            panic!("{err}");
        }
    }

    /// Advance `steps` times.
    pub fn try_advance_n(&mut self, steps: usize) -> StreamResult<()> {
        for _ in 0..steps {
            self.try_advance()?;
        }
        Ok(())
    }
}

impl<T> Clone for Cursor<T> {
    /// Independent cursor on the same cell.
    fn clone(&self) -> Self {
        Self {
            anchor: Rc::clone(&self.anchor),
            cell: Rc::clone(&self.cell),
        }
    }
}

/// Yields the current element and moves past it. Never returns `None`.
impl<T: Clone> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let head = self.get();
        self.advance();
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("root", &Rc::as_ptr(&self.anchor))
            .field("cell", &Rc::as_ptr(&self.cell))
            .field("forced", &self.is_forced())
            .finish()
    }
}
