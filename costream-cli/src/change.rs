//! Counting the ways to change an amount, four ways.
//!
//! The stream version keeps one stream per coin: `ways_k = shift(coin_k, ways_k) +
//! ways_{k-1}`, where shifting by `c` prepends `c` zeros. Element `n` of the last
//! stream is the number of ways to change `n`.
use std::collections::{BTreeMap, HashMap};

use clap::ValueEnum;
use costream::prelude::*;
use log::debug;
use strum::Display;

pub const COINS: [usize; 6] = [1, 2, 5, 10, 20, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Algorithm {
    /// Plain recursion, exponential
    Naive,
    /// Memoized in a BTreeMap
    Btree,
    /// Memoized in a HashMap
    Hash,
    /// Corecursive streams
    Stream,
}

/// Ways to change `amount` using coins up to `COINS[largest]`, in non-increasing order.
fn naive_from(amount: usize, largest: usize) -> u128 {
    if amount == 0 {
        return 1;
    }
    COINS[..=largest]
        .iter()
        .enumerate()
        .filter(|&(_, &coin)| coin <= amount)
        .map(|(index, &coin)| naive_from(amount - coin, index))
        .sum()
}

pub fn naive(amount: usize) -> u128 {
    naive_from(amount, COINS.len() - 1)
}

trait Memo: Default {
    fn lookup(&self, key: (usize, usize)) -> Option<u128>;
    fn store(&mut self, key: (usize, usize), ways: u128);
}

impl Memo for BTreeMap<(usize, usize), u128> {
    fn lookup(&self, key: (usize, usize)) -> Option<u128> {
        self.get(&key).copied()
    }

    fn store(&mut self, key: (usize, usize), ways: u128) {
        self.insert(key, ways);
    }
}

impl Memo for HashMap<(usize, usize), u128> {
    fn lookup(&self, key: (usize, usize)) -> Option<u128> {
        self.get(&key).copied()
    }

    fn store(&mut self, key: (usize, usize), ways: u128) {
        self.insert(key, ways);
    }
}

fn memoized_from<M: Memo>(memo: &mut M, amount: usize, largest: usize) -> u128 {
    if amount == 0 || largest == 0 {
        return 1;
    }
    if let Some(ways) = memo.lookup((amount, largest)) {
        return ways;
    }

    let without = memoized_from(memo, amount, largest - 1);
    let with = match amount.checked_sub(COINS[largest]) {
        Some(rest) => memoized_from(memo, rest, largest),
        None => 0,
    };
    memo.store((amount, largest), without + with);
    without + with
}

fn memoized<M: Memo>(amount: usize) -> u128 {
    let mut memo = M::default();
    // Fill smaller amounts first so the recursion never goes deeper than one level.
    for smaller in 0..amount {
        memoized_from(&mut memo, smaller, COINS.len() - 1);
    }
    memoized_from(&mut memo, amount, COINS.len() - 1)
}

pub fn btree(amount: usize) -> u128 {
    memoized::<BTreeMap<_, _>>(amount)
}

pub fn hash(amount: usize) -> u128 {
    memoized::<HashMap<_, _>>(amount)
}

/// One stream per coin; each reads the previous one by name.
pub struct ChangeStreams {
    levels: Vec<Stream<u128>>,
}

impl ChangeStreams {
    pub fn new() -> Self {
        let mut levels: Vec<Stream<u128>> = vec![Stream::repeat(1)];
        for &coin in &COINS[1..] {
            let next = {
                let previous = &levels[levels.len() - 1];
                Stream::fix(|this| Stream::prepend(coin, 0, this) + previous)
            };
            debug!("built change stream for coin {coin}");
            levels.push(next);
        }
        Self { levels }
    }

    pub fn ways(&self, amount: usize) -> StreamResult<u128> {
        let mut cursor = self.levels[self.levels.len() - 1].begin();
        cursor.try_advance_n(amount)?;
        cursor.try_get()
    }
}

impl Default for ChangeStreams {
    fn default() -> Self {
        Self::new()
    }
}

pub fn count(algorithm: Algorithm, amount: usize) -> StreamResult<u128> {
    Ok(match algorithm {
        Algorithm::Naive => naive(amount),
        Algorithm::Btree => btree(amount),
        Algorithm::Hash => hash(amount),
        Algorithm::Stream => ChangeStreams::new().ways(amount)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(naive(0), 1);
        assert_eq!(naive(4), 3);
        assert_eq!(btree(10), 11);
        assert_eq!(hash(100), 4562);
    }

    #[test]
    fn all_algorithms_agree_on_small_amounts() {
        let streams = ChangeStreams::new();
        for amount in 0..60 {
            let expected = naive(amount);
            assert_eq!(btree(amount), expected, "btree at {amount}");
            assert_eq!(hash(amount), expected, "hash at {amount}");
            assert_eq!(streams.ways(amount), Ok(expected), "stream at {amount}");
        }
    }

    #[test]
    fn stream_matches_the_memoized_count() {
        let streams = ChangeStreams::new();
        for amount in (0..200).step_by(7) {
            assert_eq!(streams.ways(amount), Ok(btree(amount)), "amount {amount}");
        }
        assert_eq!(count(Algorithm::Stream, 100), Ok(4562));
    }
}
