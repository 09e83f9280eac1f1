//! # Generic parallel reduce/scan
//!
//! This library computes a reduction (one combined value) and an inclusive
//! scan (one prefix value per element) over a fixed-size input sequence,
//! using an implicit binary tree laid out in level order.
//!
//! ## Core Algorithm
//!
//! 1. **Reduction**: every interior node stores `combine(left, right)` of its
//!    two subtrees. Leaves are never stored, they are `prepare(x)` on demand.
//! 2. **Scan**: a top-down walk carries the tally of everything to the left
//!    of the current subtree and emits `gen(combine(prior, leaf))` per leaf.
//! 3. **Fork/join**: nodes with id below `thread_budget - 1` run their left
//!    subtree as a rayon task while the right subtree runs inline.
//!
//! Because `combine` is always applied in (left, right) tree order, results
//! are deterministic no matter how the forked tasks are scheduled.
//!
//! ## Usage Example
//!
//! ```
//! use general_scan::{GeneralScan, ops::Sum};
//!
//! let mut data = vec![1i64; 8];
//! data[0] = 100;
//!
//! let mut heap = GeneralScan::new(&data, Sum::<i64>::new())?;
//! assert_eq!(heap.reduction()?, 107);
//!
//! let mut prefix = vec![0i64; data.len()];
//! heap.get_scan(&mut prefix)?;
//! assert_eq!(prefix, vec![100, 101, 102, 103, 104, 105, 106, 107]);
//! # Ok::<(), general_scan::ScanError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config; // Thread budget and padding policy
pub mod engine; // Reduction and scan engines
pub mod ops;    // Operation sets (identity, prepare, combine, gen)
pub mod tree;   // Level-order tree index arithmetic

// Re-exports for convenience
pub use config::{Padding, ScanConfig, DEFAULT_THREAD_BUDGET};
pub use engine::GeneralScan;
pub use ops::ScanOps;
pub use tree::{TreeIndex, ROOT};

use thiserror::Error;

/// Errors raised while constructing or querying a [`GeneralScan`]
#[derive(Error, Debug)]
pub enum ScanError {
    /// Input sequence cannot form a tree (empty data)
    #[error("invalid data length {len}: input must contain at least one element")]
    InvalidLength {
        /// Length of the rejected input
        len: usize,
    },

    /// Input length is not a power of two and identity padding is disabled
    #[error("data size {len} must be a power of two (next is {padded}); enable identity padding to accept it")]
    PaddingRequired {
        /// Length of the rejected input
        len: usize,
        /// Leaf count the tree would need with padding
        padded: usize,
    },

    /// Node id is outside `[0, size)`
    #[error("non-existent node {node} (tree has {size} nodes)")]
    InvalidNode {
        /// Requested node id
        node: usize,
        /// Number of nodes in the tree
        size: usize,
    },

    /// Scan output slice does not match the input length
    #[error("scan output has length {actual}, expected {expected}")]
    OutputLength {
        /// Input length
        expected: usize,
        /// Length of the slice supplied by the caller
        actual: usize,
    },

    /// Configuration rejected before any work was done
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input too large for its padded tree to be addressable
    #[error("data size {len} is too large to pad to a power of two")]
    LengthOverflow {
        /// Length of the rejected input
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offending_values() {
        let err = ScanError::InvalidNode { node: 15, size: 15 };
        assert_eq!(err.to_string(), "non-existent node 15 (tree has 15 nodes)");

        let err = ScanError::PaddingRequired { len: 3, padded: 4 };
        assert!(err.to_string().contains("power of two"));
    }
}
