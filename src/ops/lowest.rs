//! "Lowest k" operation sets
//!
//! Tally = the `K` smallest values seen, ascending, plus how many slots are
//! filled. Combining two tallies is one step of a merge sort truncated at
//! `K` outputs.

use std::fmt;

use super::ScanOps;

/// Sorted buffer of the `K` lowest values seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lowest<const K: usize> {
    slots: [i64; K],

    /// Filled prefix of `slots`
    len: usize,
}

impl<const K: usize> Lowest<K> {
    /// Filler for unused slots. Not a sentinel: `i64::MAX` is a valid value.
    pub const EMPTY: i64 = i64::MAX;

    /// No values seen
    pub fn empty() -> Self {
        Self {
            slots: [Self::EMPTY; K],
            len: 0,
        }
    }

    /// A single value
    pub fn single(value: i64) -> Self {
        let mut lowest = Self::empty();
        if K > 0 {
            lowest.slots[0] = value;
            lowest.len = 1;
        }
        lowest
    }

    /// Raw slots, including unused ones
    pub fn slots(&self) -> &[i64; K] {
        &self.slots
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.len
    }

    /// No values seen
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values actually seen, ascending
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots[..self.len].iter().copied()
    }

    /// Merge two buffers, keeping the `K` lowest
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = Self::empty();
        merged.len = K.min(self.len + other.len);
        let (mut l, mut r) = (0, 0);
        for slot in merged.slots[..merged.len].iter_mut() {
            if l < self.len && (r >= other.len || self.slots[l] <= other.slots[r]) {
                *slot = self.slots[l];
                l += 1;
            } else {
                *slot = other.slots[r];
                r += 1;
            }
        }
        merged
    }

    /// Mean of the values seen (`NaN` if none)
    pub fn mean(&self) -> f64 {
        let total: f64 = self.values().map(|v| v as f64).sum();
        total / self.len as f64
    }
}

impl<const K: usize> Default for Lowest<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const K: usize> fmt::Display for Lowest<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

/// Keeps the `K` lowest values seen so far
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestK<const K: usize>;

impl<const K: usize> ScanOps for LowestK<K> {
    type Elem = i64;
    type Tally = Lowest<K>;
    type Output = Lowest<K>;

    fn identity(&self) -> Lowest<K> {
        Lowest::empty()
    }

    fn prepare(&self, elem: &i64) -> Lowest<K> {
        Lowest::single(*elem)
    }

    fn combine(&self, left: &Lowest<K>, right: &Lowest<K>) -> Lowest<K> {
        left.merge(right)
    }

    fn gen(&self, tally: &Lowest<K>) -> Lowest<K> {
        *tally
    }
}

/// Average of the `K` lowest values seen so far
#[derive(Debug, Clone, Copy, Default)]
pub struct AvgLowestK<const K: usize>;

impl<const K: usize> ScanOps for AvgLowestK<K> {
    type Elem = i64;
    type Tally = Lowest<K>;
    type Output = f64;

    fn identity(&self) -> Lowest<K> {
        Lowest::empty()
    }

    fn prepare(&self, elem: &i64) -> Lowest<K> {
        Lowest::single(*elem)
    }

    fn combine(&self, left: &Lowest<K>, right: &Lowest<K>) -> Lowest<K> {
        left.merge(right)
    }

    fn gen(&self, tally: &Lowest<K>) -> f64 {
        tally.mean()
    }
}
