//! Bottom-up reduction
//!
//! Each interior cell is a `OnceLock` initialized by the one task that
//! visits that node. Forked tasks own disjoint subtrees, so no cell is ever
//! contended, and a parent reads its children only after the join.

use std::borrow::Cow;

use tracing::trace;

use super::GeneralScan;
use crate::ops::ScanOps;

impl<O: ScanOps> GeneralScan<'_, O> {
    /// Tally of node `i`, reducing its subtree first if needed.
    ///
    /// Interior tallies are borrowed from storage. Leaf tallies are never
    /// stored: they are `prepare`d from the input on every call, and leaves
    /// past the end of a padded input are the identity.
    pub(super) fn tally(&self, i: usize) -> Cow<'_, O::Tally> {
        if self.tree.is_leaf(i) {
            let tally = match self.data.get(self.tree.leaf_position(i)) {
                Some(elem) => self.ops.prepare(elem),
                None => self.ops.identity(),
            };
            Cow::Owned(tally)
        } else {
            Cow::Borrowed(self.interior[i].get_or_init(|| self.reduce_children(i)))
        }
    }

    /// `combine(tally(left), tally(right))`, forking near the root.
    fn reduce_children(&self, i: usize) -> O::Tally {
        let (left, right) = (self.tree.left(i), self.tree.right(i));

        if i < self.config.fork_threshold() {
            trace!(node = i, "forking reduction");
            // right subtree inline, left subtree available for stealing
            let (right_tally, left_tally) =
                rayon::join(|| self.tally(right), || self.tally(left));
            self.ops.combine(&left_tally, &right_tally)
        } else {
            let left_tally = self.tally(left);
            let right_tally = self.tally(right);
            self.ops.combine(&left_tally, &right_tally)
        }
    }
}
