//! Helpers for checking stream prefixes in tests and in the command line driver.
use std::fmt::{Debug, Display};

use log::debug;

use crate::stream::Stream;

/// The first `n` elements of `stream`.
pub fn prefix<T: Clone>(stream: &Stream<T>, n: usize) -> Vec<T> {
    stream.begin().take(n).collect()
}

/// Assert that `stream` starts with `expected` repeated `passes` times.
///
/// A single cursor is used for every pass, so a periodic stream is checked
/// across its period boundary.
pub fn compare<T>(stream: &Stream<T>, expected: &[T], passes: usize)
where
    T: Clone + PartialEq + Debug,
{
    let mut cursor = stream.begin();
    for pass in 0..passes {
        for (index, want) in expected.iter().enumerate() {
            let got = cursor.get();
            assert_eq!(
                &got,
                want,
                "element {} (pass {pass}, offset {index}) differs",
                pass * expected.len() + index,
            );
            cursor.advance();
        }
    }
}

/// Render the first `n` elements separated by spaces.
pub fn print_prefix<T: Clone + Display>(stream: &Stream<T>, n: usize) -> String {
    let rendered = stream
        .begin()
        .take(n)
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    debug!("{rendered}");
    rendered
}
