//! The catalogue of example sequences, each with the prefix it is known to start with.
use std::num::Wrapping;

use anyhow::{Result, bail};
use clap::ValueEnum;
use costream::{prelude::*, tests_utils::prefix};
use strum::Display;

/// Element type of every catalogue sequence. Arithmetic wraps so long walks never
/// trip overflow checks.
pub type Value = Wrapping<i64>;

fn v(x: i64) -> Value {
    Wrapping(x)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Example {
    /// fib = 0, fib + (1, fib)
    Fibonacci,
    /// s = 0, 1, s
    ZeroOne,
    /// ones = 1, ones
    Ones,
    /// ones + ones
    Twos,
    /// pm = 1, -pm
    Alternating,
    /// a = 1, b where b = 0, a
    MutualFirst,
    /// b = 0, a where a = 1, b
    MutualSecond,
    Naturals,
    Powers,
}

/// A built sequence together with the named streams it reads from.
pub struct Sequence {
    pub stream: Stream<Value>,
    _support: Vec<Stream<Value>>,
}

impl From<Stream<Value>> for Sequence {
    fn from(stream: Stream<Value>) -> Self {
        Sequence {
            stream,
            _support: Vec::new(),
        }
    }
}

impl Example {
    pub fn build(self) -> Sequence {
        match self {
            Example::Fibonacci => Stream::fix(|s| cons(v(0), s + cons(v(1), s))).into(),
            Example::ZeroOne => Stream::fix(|s| cons(v(0), cons(v(1), s))).into(),
            Example::Ones => Stream::repeat(v(1)).into(),
            Example::Twos => {
                let ones = Stream::repeat(v(1));
                Sequence {
                    stream: &ones + &ones,
                    _support: vec![ones],
                }
            }
            Example::Alternating => Stream::fix(|pm| cons(v(1), -pm)).into(),
            Example::MutualFirst | Example::MutualSecond => {
                let (a, b) = Stream::fix2(|a, b| (cons(v(1), b), cons(v(0), a)));
                let (stream, other) = match self {
                    Example::MutualFirst => (a, b),
                    _ => (b, a),
                };
                Sequence {
                    stream,
                    _support: vec![other],
                }
            }
            Example::Naturals => Stream::iterate(v(0), |x| x + v(1)).into(),
            Example::Powers => Stream::iterate(v(1), |x| x * v(2)).into(),
        }
    }

    /// Known prefix and how many times it repeats at the start of the sequence.
    pub fn expected(self) -> (&'static [i64], usize) {
        match self {
            Example::Fibonacci => (&[0, 1, 1, 2, 3, 5, 8, 13, 21, 34], 1),
            Example::ZeroOne => (&[0, 1], 3),
            Example::Ones => (&[1], 3),
            Example::Twos => (&[2], 3),
            Example::Alternating => (&[1, -1], 3),
            Example::MutualFirst => (&[1, 0], 3),
            Example::MutualSecond => (&[0, 1], 3),
            Example::Naturals => (&[0, 1, 2, 3, 4, 5, 6, 7], 1),
            Example::Powers => (&[1, 2, 4, 8, 16, 32, 64, 128], 1),
        }
    }

    /// Build the sequence and compare it with its known prefix.
    pub fn verify(self) -> Result<Vec<Value>> {
        let (pattern, passes) = self.expected();
        let want: Vec<Value> = pattern
            .iter()
            .cycle()
            .take(pattern.len() * passes)
            .map(|&x| v(x))
            .collect();

        let got = prefix(&self.build().stream, want.len());
        if let Some(at) = got.iter().zip(&want).position(|(g, w)| g != w) {
            bail!(
                "{}: element {at} is {}, expected {}",
                self,
                got[at],
                want[at]
            );
        }
        Ok(got)
    }
}
