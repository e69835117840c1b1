//! Cells, nodes and the forcing protocol.
//!
//! A [`Cell`] is the storage slot behind every stream position. It holds either a
//! known `Cons` or a thunk (`Map`/`Zip`), and a thunk is rewritten in place the
//! first time its value is needed. Cursors hold the cell, never the node, so every
//! cursor parked on a cell observes the rewrite.
//!
//! Cell states
//! - `Map`/`Zip` --force--> `Forcing` --replacement installed--> `Cons`
//! - `Forcing` --operator panic or source error--> the original thunk, unchanged
//! - `Cons` is final.
//!
//! Ownership
//! - A `Cons` owns its tail cell when the tail link is [`Link::Owned`]. Forcing a
//!   thunk always produces an owned tail, so the forced prefix of a stream is one
//!   strongly owned chain hanging from its root.
//! - Thunks read their sources through [`Position`]s: they keep alive the root of
//!   whatever was handed to them by value and read through weak pointers, so a
//!   stream that names itself through a [`Binding`] never forms a strong cycle.
use std::{
    cell::{Ref, RefCell},
    rc::{Rc, Weak},
};

use either::Either;
use log::trace;

use crate::{
    algebra::Operator,
    binding::Binding,
    error::{StreamError, StreamResult},
    stream::{Link, Stream},
};

pub(crate) type UnaryFn<T> = Rc<dyn Fn(T) -> T>;
pub(crate) type BinaryFn<T> = Rc<dyn Fn(T, T) -> T>;

pub(crate) type CellRef<T> = Rc<Cell<T>>;
pub(crate) type WeakCell<T> = Weak<Cell<T>>;

pub(crate) enum Node<T> {
    Cons {
        head: T,
        tail: Link<T>,
    },
    Map {
        op: UnaryFn<T>,
        tag: Operator,
        source: Position<T>,
    },
    Zip {
        op: BinaryFn<T>,
        tag: Operator,
        lhs: Position<T>,
        rhs: Position<T>,
    },
    /// Placeholder while the thunk previously stored in the cell is evaluated.
    Forcing,
}

impl<T> Node<T> {
    fn describe(&self) -> &'static str {
        match self {
            Node::Cons { .. } => "cons",
            Node::Map { tag, .. } | Node::Zip { tag, .. } => (*tag).into(),
            Node::Forcing => "forcing",
        }
    }

    /// Take the owned tail out of a `Cons`, leaving the node inert.
    fn detach_owned_tail(&mut self) -> Option<CellRef<T>> {
        match std::mem::replace(self, Node::Forcing) {
            Node::Cons {
                tail: Link::Owned(stream),
                ..
            } => Some(stream.root),
            other => {
                *self = other;
                None
            }
        }
    }
}

impl<T: Clone> Node<T> {
    /// Build the `Cons` that replaces this thunk.
    ///
    /// Sources are read first and advanced afterwards, and nothing is written
    /// anywhere: the caller installs the result once it is complete.
    fn evaluate(&self) -> StreamResult<Node<T>> {
        let (head, rest) = match self {
            Node::Map { op, tag, source } => {
                let head = op(source.head()?);
                let rest = Node::Map {
                    op: Rc::clone(op),
                    tag: *tag,
                    source: source.advanced()?,
                };
                (head, rest)
            }
            Node::Zip { op, tag, lhs, rhs } => {
                let head = op(lhs.head()?, rhs.head()?);
                let rest = Node::Zip {
                    op: Rc::clone(op),
                    tag: *tag,
                    lhs: lhs.advanced()?,
                    rhs: rhs.advanced()?,
                };
                (head, rest)
            }
            Node::Cons { .. } | Node::Forcing => unreachable!("only thunks are evaluated"),
        };

        Ok(Node::Cons {
            head,
            tail: Link::Owned(Stream::from_node(rest)),
        })
    }

    /// Copy a node that ends an owned `Cons` spine.
    fn copy_frontier(&self) -> Node<T> {
        match self {
            Node::Cons { head, tail } => Node::Cons {
                head: head.clone(),
                tail: tail.clone(),
            },
            Node::Map { op, tag, source } => Node::Map {
                op: Rc::clone(op),
                tag: *tag,
                source: source.share(),
            },
            Node::Zip { op, tag, lhs, rhs } => Node::Zip {
                op: Rc::clone(op),
                tag: *tag,
                lhs: lhs.share(),
                rhs: rhs.share(),
            },
            // A copy taken mid-force reports the same cycle once read.
            Node::Forcing => Node::Forcing,
        }
    }
}

/// Where a thunk reads its source from.
///
/// `origin` is the root of a subgraph that was handed over to the thunk by value;
/// it stays alive for as long as the thunk (or any thunk it forces into being)
/// reads from it, because streams defined through a binding loop back to their
/// own root. The read position itself is never a strong pointer, so graphs that
/// name themselves never form strong reference cycles.
pub(crate) struct Position<T> {
    origin: Option<CellRef<T>>,
    at: Target<T>,
}

enum Target<T> {
    /// A named stream, resolved through its binding on every read.
    Named(Binding<T>),
    Cell(WeakCell<T>),
}

impl<T> Position<T> {
    pub(crate) fn from_link(link: Link<T>) -> Self {
        match link {
            Link::Owned(stream) => Position {
                at: Target::Cell(Rc::downgrade(&stream.root)),
                origin: Some(stream.root),
            },
            Link::Shared(binding) => Position {
                origin: None,
                at: Target::Named(binding),
            },
        }
    }

    fn resolve(&self) -> StreamResult<CellRef<T>> {
        match &self.at {
            Target::Named(binding) => binding.resolve(),
            Target::Cell(cell) => cell.upgrade().ok_or(StreamError::DroppedBinding),
        }
    }

    /// Same origin and read position. Forced cells never change, so two thunks
    /// may read the same source subgraph.
    fn share(&self) -> Self {
        Position {
            origin: self.origin.clone(),
            at: match &self.at {
                Target::Named(binding) => Target::Named(binding.clone()),
                Target::Cell(cell) => Target::Cell(Weak::clone(cell)),
            },
        }
    }
}

impl<T: Clone> Position<T> {
    fn head(&self) -> StreamResult<T> {
        self.resolve()?.head()
    }

    /// The position one element further.
    fn advanced(&self) -> StreamResult<Self> {
        let cell = self.resolve()?;
        let at = cell.with_cons(|_, tail| match tail {
            Link::Owned(next) => Target::Cell(Rc::downgrade(&next.root)),
            Link::Shared(binding) => Target::Named(binding.clone()),
        })?;

        Ok(Position {
            origin: self.origin.clone(),
            at,
        })
    }
}

/// The storage slot behind a stream position.
pub(crate) struct Cell<T> {
    node: RefCell<Node<T>>,
}

impl<T> Cell<T> {
    pub(crate) fn new(node: Node<T>) -> CellRef<T> {
        Rc::new(Cell {
            node: RefCell::new(node),
        })
    }

    pub(crate) fn is_forced(&self) -> bool {
        matches!(self.node.try_borrow().as_deref(), Ok(Node::Cons { .. }))
    }

    /// Visit the already forced heads along the owned spine starting here,
    /// without forcing anything. Returns the number of visited cells.
    pub(crate) fn walk_forced(&self, mut visit: impl FnMut(&T)) -> usize {
        let mut count = 0;
        let mut next: Option<CellRef<T>> = None;

        loop {
            let cell = next.as_deref().unwrap_or(self);
            let step = match cell.node.try_borrow().as_deref() {
                Ok(Node::Cons { head, tail }) => {
                    visit(head);
                    count += 1;
                    match tail {
                        Link::Owned(stream) => Some(Rc::clone(&stream.root)),
                        Link::Shared(_) => None,
                    }
                }
                _ => None,
            };

            match step {
                Some(cell) => next = Some(cell),
                None => return count,
            }
        }
    }
}

impl<T: Clone> Cell<T> {
    /// Evaluate the thunk stored in this cell, at most once.
    pub(crate) fn force(&self) -> StreamResult<()> {
        match &*self.node.borrow() {
            Node::Cons { .. } => return Ok(()),
            Node::Forcing => return Err(StreamError::CyclicForce),
            Node::Map { .. } | Node::Zip { .. } => {}
        }

        let thunk = std::mem::replace(&mut *self.node.borrow_mut(), Node::Forcing);
        trace!("forcing `{}` cell {:p}", thunk.describe(), self);

        let mut pending = Pending {
            cell: self,
            thunk,
            armed: true,
        };
        let forced = pending.thunk.evaluate()?;
        pending.armed = false;

        *self.node.borrow_mut() = forced;
        Ok(())
    }

    /// Force this cell and visit its `Cons`.
    pub(crate) fn with_cons<R>(&self, visit: impl FnOnce(&T, &Link<T>) -> R) -> StreamResult<R> {
        self.force()?;
        match &*self.node.borrow() {
            Node::Cons { head, tail } => Ok(visit(head, tail)),
            _ => unreachable!("a forced cell always holds a cons"),
        }
    }

    pub(crate) fn head(&self) -> StreamResult<T> {
        self.with_cons(|head, _| head.clone())
    }

    pub(crate) fn head_ref(&self) -> StreamResult<Ref<'_, T>> {
        self.force()?;
        Ok(Ref::map(self.node.borrow(), |node| match node {
            Node::Cons { head, .. } => head,
            _ => unreachable!("a forced cell always holds a cons"),
        }))
    }

    /// Copy the subgraph owned by this cell.
    ///
    /// The owned `Cons` spine and the thunk ending it are copied, the spine
    /// iteratively. Shared links keep their binding and the copied thunk reads the
    /// same source cells as the original.
    pub(crate) fn deep_copy(&self) -> CellRef<T> {
        let mut heads = Vec::new();
        let mut next: Option<CellRef<T>> = None;

        let frontier = loop {
            let cell = next.as_deref().unwrap_or(self);
            let step = match &*cell.node.borrow() {
                Node::Cons {
                    head,
                    tail: Link::Owned(stream),
                } => {
                    heads.push(head.clone());
                    Either::Left(Rc::clone(&stream.root))
                }
                node => Either::Right(node.copy_frontier()),
            };

            match step {
                Either::Left(cell) => next = Some(cell),
                Either::Right(frontier) => break frontier,
            }
        };

        heads
            .into_iter()
            .rev()
            .fold(Cell::new(frontier), |tail, head| {
                Cell::new(Node::Cons {
                    head,
                    tail: Link::Owned(Stream::from_root(tail)),
                })
            })
    }
}

impl<T> Drop for Cell<T> {
    fn drop(&mut self) {
        // Release the owned spine front to back instead of recursively.
        let mut next = self.node.get_mut().detach_owned_tail();
        while let Some(cell) = next {
            next = match Rc::try_unwrap(cell) {
                Ok(mut cell) => cell.node.get_mut().detach_owned_tail(),
                Err(_) => None,
            };
        }
    }
}

/// Thunk taken out of its cell for evaluation. Puts it back unless disarmed.
struct Pending<'a, T> {
    cell: &'a Cell<T>,
    thunk: Node<T>,
    armed: bool,
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let thunk = std::mem::replace(&mut self.thunk, Node::Forcing);
            *self.cell.node.borrow_mut() = thunk;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones() -> CellRef<i32> {
        let stream = Stream::repeat(1);
        Rc::clone(&stream.root)
    }

    #[test]
    fn cons_cell_is_forced_from_the_start() {
        let cell = ones();
        assert!(cell.is_forced());
        assert_eq!(cell.head(), Ok(1));
    }

    #[test]
    fn forcing_a_map_installs_a_cons_with_an_owned_thunk_tail() {
        let source = Stream::cons(3, Stream::repeat(4));
        let cell = Cell::new(Node::Map {
            op: Rc::new(|x: i32| x * 10),
            tag: Operator::Map,
            source: Position::from_link(Link::Owned(source)),
        });

        assert!(!cell.is_forced());
        assert_eq!(cell.head(), Ok(30));
        assert!(cell.is_forced());

        let tail_forced = cell
            .with_cons(|_, tail| match tail {
                Link::Owned(stream) => stream.root.is_forced(),
                Link::Shared(_) => panic!("forced tails are owned"),
            })
            .unwrap();
        assert!(!tail_forced);
    }

    #[test]
    fn reentering_a_cell_reports_a_cycle() {
        let binding = Binding::new();
        let cell = Cell::new(Node::Map {
            op: Rc::new(|x: i32| x + 1),
            tag: Operator::Map,
            source: Position::from_link(Link::Shared(binding.clone())),
        });
        binding
            .attach(&Stream::from_root(Rc::clone(&cell)))
            .unwrap();

        assert_eq!(cell.force(), Err(StreamError::CyclicForce));
        // The thunk is restored, so the cell still reports the same cycle.
        assert!(!cell.is_forced());
        assert_eq!(cell.force(), Err(StreamError::CyclicForce));
    }

    #[test]
    fn walk_forced_stops_at_thunks_and_shared_links() {
        let cell = ones();
        let mut seen = Vec::new();
        assert_eq!(cell.walk_forced(|x| seen.push(*x)), 1);
        assert_eq!(seen, [1]);
    }

    #[test]
    fn deep_copy_duplicates_the_owned_spine() {
        let stream = Stream::prepend(3, 7, Stream::repeat(1));
        let copy = stream.root.deep_copy();

        assert!(!Rc::ptr_eq(&copy, &stream.root));
        assert_eq!(copy.walk_forced(|_| {}), 4);
        assert_eq!(copy.head(), Ok(7));
    }
}
