//! Costream: memoizing lazy infinite streams.
//!
//! A [`Stream`](stream::Stream) is a potentially infinite sequence whose elements
//! are computed on demand and at most once. Streams may be defined in terms of
//! themselves (corecursion) and combined elementwise with the usual arithmetic
//! operators; independent [`Cursor`](cursor::Cursor)s walk them without ever
//! recomputing an element another cursor has already forced.
//!
//! Storage model
//!  - Every position is a reference counted cell holding either a known head and
//!    tail (`Cons`) or a thunk (an operator over source positions). Forcing a thunk
//!    rewrites the cell in place, so all cursors on it see the memoized value.
//!  - Passing a stream by value hands its subgraph over; passing it by reference,
//!    or passing a [`Binding`](binding::Binding), refers to it by name. Names are
//!    what make self reference finite.
//!
//! Example
//! ```
//! use costream::prelude::*;
//!
//! // fib = 0, 1, 1, 2, 3, 5, ...
//! let fib: Stream<u64> = Stream::fix(|fib| cons(0, fib + cons(1, fib)));
//! let first: Vec<u64> = fib.begin().take(10).collect();
//! assert_eq!(first, [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
//!
//! // A second cursor reads the memoized prefix.
//! let mut cursor = fib.begin();
//! cursor.advance();
//! assert!(cursor.is_forced());
//! ```

/// Elementwise operators, `map` and `zip_with`.
pub mod algebra;
/// Write-once names used by corecursive definitions.
pub mod binding;
/// Cursors walking a stream.
pub mod cursor;
pub mod error;
pub(crate) mod node;
/// The stream handle and its constructors.
pub mod stream;

#[cfg(any(test, feature = "test-utils"))]
pub mod tests_utils;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::algebra::{Operator, map, zip_with};
    pub use crate::binding::Binding;
    pub use crate::cursor::Cursor;
    pub use crate::error::{StreamError, StreamResult};
    pub use crate::stream::{Link, Stream, cons};
}
