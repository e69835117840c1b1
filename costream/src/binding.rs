//! Names for streams that do not exist yet.
//!
//! A corecursive definition refers to the stream it is defining. The [`Binding`]
//! is created before the definition runs, captured by it as a shared link, and
//! populated once the stream is built. Reads always go through the binding, so
//! the cycle is one shared node rather than an infinite unrolling.
//!
//! A binding only observes its stream (it holds a weak pointer): the named
//! [`Stream`] handle, or a cursor started on it, must outlive every read that goes
//! through the binding.
use std::{fmt, rc::Rc};

use log::debug;
use once_cell::unsync::OnceCell;

use crate::{
    error::{StreamError, StreamResult},
    node::{CellRef, WeakCell},
    stream::Stream,
};

/// Shared, write-once indirection to the root of a stream.
///
/// Cloning a binding clones the name, not the stream: every clone resolves to the
/// same root.
pub struct Binding<T> {
    slot: Rc<OnceCell<WeakCell<T>>>,
}

impl<T> Binding<T> {
    /// Create an unbound name.
    pub fn new() -> Self {
        Self {
            slot: Rc::new(OnceCell::new()),
        }
    }

    /// A name already bound to `root`.
    pub(crate) fn to(root: &CellRef<T>) -> Self {
        Self {
            slot: Rc::new(OnceCell::with_value(Rc::downgrade(root))),
        }
    }

    /// Bind this name to `stream` and hand the stream back.
    ///
    /// Fails with [`StreamError::AlreadyBound`] on a second call.
    ///
    /// ```
    /// use costream::prelude::*;
    ///
    /// let a = Binding::new();
    /// let b = Binding::new();
    /// let evens: Stream<u8> = a.bind(cons(0, &b)).unwrap();
    /// let odds: Stream<u8> = b.bind(cons(1, &a)).unwrap();
    ///
    /// assert_eq!(evens.begin().take(4).collect::<Vec<_>>(), [0, 1, 0, 1]);
    /// assert_eq!(odds.begin().take(4).collect::<Vec<_>>(), [1, 0, 1, 0]);
    /// ```
    pub fn bind(&self, stream: Stream<T>) -> StreamResult<Stream<T>> {
        self.attach(&stream)?;
        Ok(stream)
    }

    pub(crate) fn attach(&self, stream: &Stream<T>) -> StreamResult<()> {
        self.slot
            .set(Rc::downgrade(&stream.root))
            .map_err(|_| StreamError::AlreadyBound)?;
        debug!("binding {:p} bound to cell {:p}", self.slot, stream.root);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Strong handle to the root cell, failing if unbound or already dropped.
    pub(crate) fn resolve(&self) -> StreamResult<CellRef<T>> {
        self.slot
            .get()
            .ok_or(StreamError::UnboundBinding)?
            .upgrade()
            .ok_or(StreamError::DroppedBinding)
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot.get() {
            None => "unbound",
            Some(root) if root.strong_count() == 0 => "dropped",
            Some(_) => "bound",
        };
        f.debug_tuple("Binding").field(&state).finish()
    }
}
