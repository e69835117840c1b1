//! Stream handles and their construction.
//!
//! A [`Stream`] owns the root cell of a lazily evaluated, infinite sequence. Tails
//! and operator sources are stored as [`Link`]s, tagged at construction time:
//!
//! - passing a `Stream<T>` by value hands the subgraph over ([`Link::Owned`]);
//! - passing `&Stream<T>` or `&Binding<T>` refers to a named stream
//!   ([`Link::Shared`]) without copying it.
//!
//! Cloning a stream copies what it owns and keeps every shared link as is, which
//! is what keeps cloning a corecursive definition finite.
use std::{fmt, rc::Rc};

use log::warn;

use crate::{
    algebra,
    binding::Binding,
    cursor::Cursor,
    node::{Cell, CellRef, Node},
};

/// Handle owning the root of an infinite stream.
pub struct Stream<T> {
    pub(crate) root: CellRef<T>,
}

/// A sub-sequence reference stored inside the stream graph.
pub enum Link<T> {
    /// A fresh subgraph owned by the node holding the link.
    Owned(Stream<T>),
    /// A named stream, read through its binding and never copied.
    Shared(Binding<T>),
}

impl<T: Clone> Clone for Link<T> {
    fn clone(&self) -> Self {
        match self {
            Link::Owned(stream) => Link::Owned(stream.clone()),
            Link::Shared(binding) => Link::Shared(binding.clone()),
        }
    }
}

impl<T> From<Stream<T>> for Link<T> {
    fn from(stream: Stream<T>) -> Self {
        Link::Owned(stream)
    }
}

impl<T> From<&Stream<T>> for Link<T> {
    fn from(stream: &Stream<T>) -> Self {
        Link::Shared(Binding::to(&stream.root))
    }
}

impl<T> From<&Binding<T>> for Link<T> {
    fn from(binding: &Binding<T>) -> Self {
        Link::Shared(binding.clone())
    }
}

/// Prepend `head` to `tail`.
///
/// ```
/// use costream::prelude::*;
///
/// let zero_one: Stream<i32> = Stream::fix(|s| cons(0, cons(1, s)));
/// assert_eq!(zero_one.begin().take(5).collect::<Vec<_>>(), [0, 1, 0, 1, 0]);
/// ```
pub fn cons<T>(head: T, tail: impl Into<Link<T>>) -> Stream<T> {
    Stream::cons(head, tail)
}

impl<T> Stream<T> {
    pub(crate) fn from_root(root: CellRef<T>) -> Self {
        Self { root }
    }

    pub(crate) fn from_node(node: Node<T>) -> Self {
        Self::from_root(Cell::new(node))
    }

    /// Stream whose first element is `head`, followed by `tail`.
    pub fn cons(head: T, tail: impl Into<Link<T>>) -> Self {
        Self::from_node(Node::Cons {
            head,
            tail: tail.into(),
        })
    }

    /// Define a stream in terms of itself.
    ///
    /// `define` receives the name of the stream it is building; the name is bound
    /// to the result once `define` returns, before anything can be forced.
    pub fn fix(define: impl FnOnce(&Binding<T>) -> Stream<T>) -> Self {
        let binding = Binding::new();
        let stream = define(&binding);
        if binding.attach(&stream).is_err() {
            warn!("binding was bound inside its own definition; keeping the earlier stream");
        }
        stream
    }

    /// Define two mutually recursive streams.
    ///
    /// ```
    /// use costream::prelude::*;
    ///
    /// let (a, b): (Stream<f64>, Stream<f64>) =
    ///     Stream::fix2(|a, b| (cons(1.0, b), cons(0.0, a)));
    /// assert_eq!(a.begin().take(3).collect::<Vec<_>>(), [1.0, 0.0, 1.0]);
    /// assert_eq!(b.begin().take(3).collect::<Vec<_>>(), [0.0, 1.0, 0.0]);
    /// ```
    pub fn fix2(
        define: impl FnOnce(&Binding<T>, &Binding<T>) -> (Stream<T>, Stream<T>),
    ) -> (Self, Self) {
        let first = Binding::new();
        let second = Binding::new();
        let (a, b) = define(&first, &second);
        let first_attached = first.attach(&a).is_ok();
        let second_attached = second.attach(&b).is_ok();
        if !(first_attached && second_attached) {
            warn!("binding was bound inside its own definition; keeping the earlier stream");
        }
        (a, b)
    }

    /// Cursor on the first element.
    pub fn begin(&self) -> Cursor<T> {
        Cursor::new(Rc::clone(&self.root))
    }

    /// Number of elements already forced along the stream's own spine.
    ///
    /// Nothing is forced; the walk stops at the first thunk or shared link.
    pub fn memoized_len(&self) -> usize {
        self.root.walk_forced(|_| {})
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// The constant stream `value, value, ...`.
    pub fn repeat(value: T) -> Self {
        Self::fix(|this| cons(value, this))
    }

    /// `count` copies of `value` followed by `tail`.
    ///
    /// With `count == 0` the result reads the tail unchanged; a shared tail is
    /// then wrapped in an identity map.
    pub fn prepend(count: usize, value: T, tail: impl Into<Link<T>>) -> Self {
        let mut link = tail.into();
        for _ in 0..count {
            link = Link::Owned(cons(value.clone(), link));
        }

        match link {
            Link::Owned(stream) => stream,
            shared @ Link::Shared(_) => algebra::map(|x| x, shared),
        }
    }

    /// `seed, f(seed), f(f(seed)), ...`
    pub fn iterate(seed: T, f: impl Fn(T) -> T + 'static) -> Self {
        Self::fix(|this| cons(seed, algebra::map(f, this)))
    }
}

impl<T: Clone> Clone for Stream<T> {
    /// Deep copy of the owned subgraph; shared links keep their targets.
    fn clone(&self) -> Self {
        Self::from_root(self.root.deep_copy())
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    /// Shows the memoized prefix only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        self.root.walk_forced(|head| {
            list.entry(head);
        });
        list.finish_non_exhaustive()
    }
}
