//! Elementwise stream algebra.
//!
//! Every operator builds an unevaluated node: binary operators a `Zip` over both
//! operands, negation a `Map`. Element `n` of the result is `op(a[n], b[n])` and is
//! computed only when some cursor reaches it, reading no further into the operands
//! than that.
//!
//! Operands follow the same ownership rule as [`cons`](crate::stream::cons): a
//! `Stream<T>` is moved into the result, `&Stream<T>` and `&Binding<T>` are
//! referenced. This is what lets recurrences be written directly:
//!
//! ```
//! use costream::prelude::*;
//!
//! // Each element is the sum of the two before it.
//! let fib: Stream<u64> = Stream::fix(|s| cons(0, s + cons(1, s)));
//! assert_eq!(fib.begin().nth(10), Some(55));
//!
//! // Alternating signs.
//! let pm: Stream<i32> = Stream::fix(|pm| cons(1, -pm));
//! assert_eq!(pm.begin().take(4).collect::<Vec<_>>(), [1, -1, 1, -1]);
//! ```
use std::{
    ops::{Add, Div, Mul, Neg, Rem, Sub},
    rc::Rc,
};

use strum::{Display, EnumIs, IntoStaticStr};

use crate::{
    binding::Binding,
    node::{BinaryFn, Node, Position, UnaryFn},
    stream::{Link, Stream},
};

/// Label carried by every operator node, used in logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIs)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
    #[strum(serialize = "neg")]
    Neg,
    #[strum(serialize = "map")]
    Map,
    #[strum(serialize = "zip_with")]
    ZipWith,
}

/// Apply `op` to every element of `source`.
pub fn map<T: Clone + 'static>(
    op: impl Fn(T) -> T + 'static,
    source: impl Into<Link<T>>,
) -> Stream<T> {
    map_tagged(Operator::Map, Rc::new(op), source.into())
}

/// Combine `lhs` and `rhs` position by position with `op`.
///
/// ```
/// use costream::prelude::*;
///
/// let nat: Stream<u32> = Stream::iterate(0, |x| x + 1);
/// let max = zip_with(|a, b| a.max(b), &nat, Stream::repeat(3));
/// assert_eq!(max.begin().take(6).collect::<Vec<_>>(), [3, 3, 3, 3, 4, 5]);
/// ```
pub fn zip_with<T: Clone + 'static>(
    op: impl Fn(T, T) -> T + 'static,
    lhs: impl Into<Link<T>>,
    rhs: impl Into<Link<T>>,
) -> Stream<T> {
    zip_tagged(Operator::ZipWith, Rc::new(op), lhs.into(), rhs.into())
}

fn map_tagged<T>(tag: Operator, op: UnaryFn<T>, source: Link<T>) -> Stream<T> {
    Stream::from_node(Node::Map {
        op,
        tag,
        source: Position::from_link(source),
    })
}

fn zip_tagged<T>(tag: Operator, op: BinaryFn<T>, lhs: Link<T>, rhs: Link<T>) -> Stream<T> {
    Stream::from_node(Node::Zip {
        op,
        tag,
        lhs: Position::from_link(lhs),
        rhs: Position::from_link(rhs),
    })
}

macro_rules! impl_elementwise_binary {
    ($trait_:ident, $method:ident) => {
        impl<T, R> $trait_<R> for Stream<T>
        where
            T: $trait_<Output = T> + Clone + 'static,
            R: Into<Link<T>>,
        {
            type Output = Stream<T>;

            fn $method(self, rhs: R) -> Stream<T> {
                zip_tagged(
                    Operator::$trait_,
                    Rc::new(<T as $trait_>::$method),
                    self.into(),
                    rhs.into(),
                )
            }
        }

        impl<'a, T, R> $trait_<R> for &'a Stream<T>
        where
            T: $trait_<Output = T> + Clone + 'static,
            R: Into<Link<T>>,
        {
            type Output = Stream<T>;

            fn $method(self, rhs: R) -> Stream<T> {
                zip_tagged(
                    Operator::$trait_,
                    Rc::new(<T as $trait_>::$method),
                    self.into(),
                    rhs.into(),
                )
            }
        }

        impl<'a, T, R> $trait_<R> for &'a Binding<T>
        where
            T: $trait_<Output = T> + Clone + 'static,
            R: Into<Link<T>>,
        {
            type Output = Stream<T>;

            fn $method(self, rhs: R) -> Stream<T> {
                zip_tagged(
                    Operator::$trait_,
                    Rc::new(<T as $trait_>::$method),
                    self.into(),
                    rhs.into(),
                )
            }
        }
    };
}

impl_elementwise_binary!(Add, add);
impl_elementwise_binary!(Sub, sub);
impl_elementwise_binary!(Mul, mul);
impl_elementwise_binary!(Div, div);
impl_elementwise_binary!(Rem, rem);

impl<T> Neg for Stream<T>
where
    T: Neg<Output = T> + Clone + 'static,
{
    type Output = Stream<T>;

    fn neg(self) -> Stream<T> {
        map_tagged(Operator::Neg, Rc::new(<T as Neg>::neg), self.into())
    }
}

impl<'a, T> Neg for &'a Stream<T>
where
    T: Neg<Output = T> + Clone + 'static,
{
    type Output = Stream<T>;

    fn neg(self) -> Stream<T> {
        map_tagged(Operator::Neg, Rc::new(<T as Neg>::neg), self.into())
    }
}

impl<'a, T> Neg for &'a Binding<T>
where
    T: Neg<Output = T> + Clone + 'static,
{
    type Output = Stream<T>;

    fn neg(self) -> Stream<T> {
        map_tagged(Operator::Neg, Rc::new(<T as Neg>::neg), self.into())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{stream::cons, tests_utils::compare};

    #[test]
    fn operator_labels() {
        assert_eq!(Operator::Add.to_string(), "+");
        assert_eq!(<&'static str>::from(Operator::ZipWith), "zip_with");
        assert!(Operator::Neg.is_neg());
    }

    #[test]
    fn binary_operators_are_elementwise() {
        let nat: Stream<i64> = Stream::iterate(1, |x| x + 1);
        let twos = Stream::repeat(2i64);

        compare(&(&nat + &twos), &[3, 4, 5, 6], 1);
        compare(&(&nat - &twos), &[-1, 0, 1, 2], 1);
        compare(&(&nat * &twos), &[2, 4, 6, 8], 1);
        compare(&(&nat / &twos), &[0, 1, 1, 2], 1);
        compare(&(&nat % &twos), &[1, 0, 1, 0], 1);
        compare(&(-&nat), &[-1, -2, -3, -4], 1);
    }

    #[test]
    fn owned_operands_are_consumed() {
        let sum = Stream::repeat(1) + Stream::repeat(2);
        compare(&sum, &[3], 5);
        compare(&(-sum), &[-3], 5);
    }

    #[test]
    fn map_runs_lazily_and_once_per_element() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let nat: Stream<u32> = Stream::iterate(0, |x| x + 1);
        let squares = map(
            move |x: u32| {
                counter.set(counter.get() + 1);
                x * x
            },
            &nat,
        );
        assert_eq!(calls.get(), 0);

        compare(&squares, &[0, 1, 4, 9], 1);
        assert_eq!(calls.get(), 4);

        compare(&squares, &[0, 1, 4, 9], 1);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn self_negating_recurrence() {
        let pm: Stream<i32> = Stream::fix(|pm| cons(1, -pm));
        compare(&pm, &[1, -1], 3);
    }
}
