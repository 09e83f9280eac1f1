//! Bucketed histogram over a fixed value range
//!
//! `[lo, hi)` is split into `buckets` equal-width buckets. Bucket 0 counts
//! values below `lo`, bucket `buckets + 1` counts values at or above `hi`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ScanOps;
use crate::ScanError;

/// Per-bucket counts, underflow first and overflow last
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BucketCounts {
    counts: Vec<u64>,
}

impl BucketCounts {
    /// All-zero counts for `len` buckets
    pub fn zeroed(len: usize) -> Self {
        Self {
            counts: vec![0; len],
        }
    }

    /// Counts, underflow first and overflow last
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of values counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl fmt::Display for BucketCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|")?;
        for count in &self.counts {
            write!(f, "{}|", count)?;
        }
        Ok(())
    }
}

/// Histogram operation set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Histogram {
    lo: i64,
    hi: i64,
    buckets: usize,
    width: i64,
}

impl Default for Histogram {
    /// Ten buckets over `[0, 100)`
    fn default() -> Self {
        Self {
            lo: 0,
            hi: 100,
            buckets: 10,
            width: 10,
        }
    }
}

impl Histogram {
    /// Histogram of `buckets` buckets over `[lo, hi)`
    pub fn new(lo: i64, hi: i64, buckets: usize) -> Result<Self, ScanError> {
        if buckets == 0 {
            return Err(ScanError::InvalidConfiguration(
                "histogram needs at least one bucket".to_string(),
            ));
        }
        if hi <= lo {
            return Err(ScanError::InvalidConfiguration(format!(
                "histogram range [{}, {}) is empty",
                lo, hi
            )));
        }
        let span = hi.checked_sub(lo).ok_or_else(|| {
            ScanError::InvalidConfiguration(format!("histogram range [{}, {}) overflows", lo, hi))
        })?;
        let width = span / i64::try_from(buckets).unwrap_or(i64::MAX);
        if width == 0 {
            return Err(ScanError::InvalidConfiguration(format!(
                "{} buckets do not fit in range [{}, {})",
                buckets, lo, hi
            )));
        }
        Ok(Self {
            lo,
            hi,
            buckets,
            width,
        })
    }

    /// Number of counters in a tally (`buckets + 2`)
    pub fn len(&self) -> usize {
        self.buckets + 2
    }

    /// Never empty: underflow and overflow buckets always exist
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bucket index for `value`
    pub fn bucket_of(&self, value: i64) -> usize {
        if value < self.lo {
            0
        } else if value >= self.hi {
            self.buckets + 1
        } else {
            // values in the remainder past the last full bucket land in the last one
            let idx = ((value - self.lo) / self.width) as usize;
            1 + idx.min(self.buckets - 1)
        }
    }
}

impl ScanOps for Histogram {
    type Elem = i64;
    type Tally = BucketCounts;
    type Output = BucketCounts;

    fn identity(&self) -> BucketCounts {
        BucketCounts::zeroed(self.len())
    }

    fn prepare(&self, elem: &i64) -> BucketCounts {
        let mut counts = BucketCounts::zeroed(self.len());
        counts.counts[self.bucket_of(*elem)] += 1;
        counts
    }

    fn combine(&self, left: &BucketCounts, right: &BucketCounts) -> BucketCounts {
        BucketCounts {
            counts: left
                .counts
                .iter()
                .zip(&right.counts)
                .map(|(l, r)| l + r)
                .collect(),
        }
    }

    fn gen(&self, tally: &BucketCounts) -> BucketCounts {
        tally.clone()
    }
}
