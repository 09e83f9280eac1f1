//! Top-down inclusive scan
//!
//! `prior` is the tally of every input element left of the current
//! subtree. The output slice handed to a node is exactly its subtree's
//! share of the result, so forked halves write through disjoint borrows.

use tracing::trace;

use super::GeneralScan;
use crate::ops::ScanOps;

impl<O: ScanOps> GeneralScan<'_, O> {
    /// Scan the subtree rooted at `i` into `out`.
    ///
    /// `out` may be shorter than the subtree's leaf span when the tree is
    /// padded; phantom leaves have no slot and are skipped.
    pub(super) fn scan_node(&self, i: usize, prior: O::Tally, out: &mut [O::Output]) {
        if out.is_empty() {
            return;
        }
        if self.tree.is_leaf(i) {
            out[0] = self.ops.gen(&self.ops.combine(&prior, &self.tally(i)));
            return;
        }

        let (left, right) = (self.tree.left(i), self.tree.right(i));
        let mid = (self.tree.span_len(i) / 2).min(out.len());
        let (out_left, out_right) = out.split_at_mut(mid);
        let prior_right = self.ops.combine(&prior, &self.tally(left));

        if i < self.config.fork_threshold() {
            trace!(node = i, "forking scan");
            rayon::join(
                || self.scan_node(right, prior_right, out_right),
                || self.scan_node(left, prior, out_left),
            );
        } else {
            self.scan_node(left, prior, out_left);
            self.scan_node(right, prior_right, out_right);
        }
    }
}
