//! Engine configuration
//!
//! The thread budget decides how many tree levels fork (nodes with id below
//! `thread_budget - 1`). It is not a thread count: forked subtrees are
//! tasks on rayon's shared pool.

use crate::ScanError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of threads used for the top levels of the tree
pub const DEFAULT_THREAD_BUDGET: usize = 16;

/// How inputs whose length is not a power of two are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Padding {
    /// Reject non-power-of-two lengths at construction
    #[default]
    Strict,

    /// Build the tree over the next power of two; the extra leaves
    /// evaluate to `identity()` and produce no scan output
    Identity,
}

/// Configuration parameters for a [`GeneralScan`](crate::GeneralScan)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanConfig {
    /// Thread budget (>= 1). `1` runs both phases sequentially.
    pub thread_budget: usize,

    /// Policy for non-power-of-two inputs
    pub padding: Padding,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanConfig {
    /// Default configuration: 16 threads, strict power-of-two input
    pub fn new() -> Self {
        Self {
            thread_budget: DEFAULT_THREAD_BUDGET,
            padding: Padding::Strict,
        }
    }

    /// Set the thread budget.
    pub fn with_thread_budget(mut self, thread_budget: usize) -> Self {
        self.thread_budget = thread_budget;
        self
    }

    /// Set the padding policy.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Node ids strictly below this value fork their left subtree.
    pub fn fork_threshold(&self) -> usize {
        self.thread_budget.saturating_sub(1)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.thread_budget == 0 {
            return Err(ScanError::InvalidConfiguration(
                "thread budget must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Leaf count of the tree built over `len` elements.
    pub fn leaf_count(&self, len: usize) -> Result<usize, ScanError> {
        if len == 0 {
            return Err(ScanError::InvalidLength { len });
        }
        if len.is_power_of_two() {
            return Ok(len);
        }
        let padded = len
            .checked_next_power_of_two()
            .ok_or(ScanError::LengthOverflow { len })?;
        match self.padding {
            Padding::Strict => Err(ScanError::PaddingRequired { len, padded }),
            Padding::Identity => Ok(padded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let config = ScanConfig::default();
        assert_eq!(config.thread_budget, 16);
        assert_eq!(config.fork_threshold(), 15);
        assert_eq!(config.padding, Padding::Strict);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = ScanConfig::new().with_thread_budget(0);
        assert!(matches!(
            config.validate(),
            Err(ScanError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_leaf_count_strict() {
        let config = ScanConfig::new();
        assert_eq!(config.leaf_count(1).unwrap(), 1);
        assert_eq!(config.leaf_count(8).unwrap(), 8);
        assert!(matches!(
            config.leaf_count(3),
            Err(ScanError::PaddingRequired { len: 3, padded: 4 })
        ));
        assert!(matches!(
            config.leaf_count(0),
            Err(ScanError::InvalidLength { len: 0 })
        ));
    }

    #[test]
    fn test_leaf_count_padded() {
        let config = ScanConfig::new().with_padding(Padding::Identity);
        assert_eq!(config.leaf_count(3).unwrap(), 4);
        assert_eq!(config.leaf_count(5).unwrap(), 8);
        assert_eq!(config.leaf_count(16).unwrap(), 16);
        assert!(config.leaf_count(0).is_err());
    }

    #[test]
    fn test_leaf_count_overflow() {
        let len = usize::MAX / 2 + 2;
        for padding in [Padding::Strict, Padding::Identity] {
            let config = ScanConfig::new().with_padding(padding);
            let err = config.leaf_count(len).unwrap_err();
            assert!(matches!(err, ScanError::LengthOverflow { len: l } if l == len));
            assert!(err.to_string().contains("too large"));
        }
    }
}
