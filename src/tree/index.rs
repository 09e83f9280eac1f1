//! Level-order index arithmetic for a complete binary tree
//!
//! Node 0 is the root. With `L` leaves:
//!   Interior ids: `0 .. L-1`
//!   Leaf ids:     `L-1 .. 2L-1`, leaf `L-1+k` holds input position `k`
//!   Children:     `2i+1` and `2i+2`

use std::ops::Range;

/// Tree index (implicit - just the leaf count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeIndex {
    /// Number of leaves (always a power of two)
    leaves: usize,
}

impl TreeIndex {
    /// Create the index for a tree with `leaves` leaves
    pub fn new(leaves: usize) -> Self {
        debug_assert!(leaves.is_power_of_two(), "leaf count must be a power of two");
        Self { leaves }
    }

    /// Number of leaves
    #[inline]
    pub fn leaves(&self) -> usize {
        self.leaves
    }

    /// Number of interior nodes (`leaves - 1`)
    #[inline]
    pub fn interior_len(&self) -> usize {
        self.leaves - 1
    }

    /// Total node count (`2 * leaves - 1`)
    #[inline]
    pub fn size(&self) -> usize {
        self.interior_len() + self.leaves
    }

    /// Levels below the root (0 for a single leaf)
    #[inline]
    pub fn height(&self) -> u32 {
        self.leaves.trailing_zeros()
    }

    /// Whether `i` names a node of this tree
    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        i < self.size()
    }

    /// Parent of `i` (the root is its own parent)
    #[inline]
    pub fn parent(&self, i: usize) -> usize {
        i.saturating_sub(1) / 2
    }

    /// Left child of `i`
    #[inline]
    pub fn left(&self, i: usize) -> usize {
        i * 2 + 1
    }

    /// Right child of `i`
    #[inline]
    pub fn right(&self, i: usize) -> usize {
        self.left(i) + 1
    }

    /// Check if leaf (no children inside the tree)
    #[inline]
    pub fn is_leaf(&self, i: usize) -> bool {
        self.left(i) >= self.size()
    }

    /// Distance from the root (root = 0)
    #[inline]
    pub fn depth(&self, i: usize) -> u32 {
        (i + 1).ilog2()
    }

    /// Number of leaves under `i`
    #[inline]
    pub fn span_len(&self, i: usize) -> usize {
        self.leaves >> self.depth(i)
    }

    /// Input position held by leaf `i`
    #[inline]
    pub fn leaf_position(&self, i: usize) -> usize {
        debug_assert!(self.is_leaf(i), "only leaves map to input positions");
        i - self.interior_len()
    }

    /// Leaf id holding input position `pos`
    #[inline]
    pub fn leaf_node(&self, pos: usize) -> usize {
        pos + self.interior_len()
    }

    /// Input positions covered by the subtree rooted at `i`
    pub fn leaf_span(&self, i: usize) -> Range<usize> {
        let mut lo = i;
        let mut hi = i;
        while !self.is_leaf(lo) {
            lo = self.left(lo);
            hi = self.right(hi);
        }
        self.leaf_position(lo)..self.leaf_position(hi) + 1
    }
}
