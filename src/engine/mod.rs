//! Reduce/scan engine
//!
//! Two phases over the same implicit tree:
//!
//! 1. **Reduction** (`reduce.rs`): bottom-up, every interior node is set
//!    once to `combine(left, right)`. Runs lazily on the first request.
//! 2. **Scan** (`scan.rs`): top-down, reads the stored tallies and writes
//!    one inclusive prefix result per input element.
//!
//! Both phases fork at nodes with id below `thread_budget - 1` and recurse
//! sequentially elsewhere. Forks are rayon tasks on the global pool, so the
//! budget bounds fan-out, never the number of OS threads.

mod reduce;
mod scan;

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use crate::{
    config::ScanConfig,
    ops::ScanOps,
    tree::{TreeIndex, ROOT},
    ScanError,
};

/// Generalized reducer/scanner over a borrowed input sequence.
///
/// The engine starts unreduced. The first call to
/// [`get_reduction`](GeneralScan::get_reduction) or
/// [`get_scan`](GeneralScan::get_scan) computes every interior tally; later
/// calls reuse them.
pub struct GeneralScan<'a, O: ScanOps> {
    /// Input elements (leaves), never copied
    data: &'a [O::Elem],

    /// Operation set
    ops: O,

    /// Tree shape (leaf count may exceed `data.len()` when padded)
    tree: TreeIndex,

    /// Interior tallies in level order, each set exactly once
    interior: Vec<OnceLock<O::Tally>>,

    /// Set after the first full reduction
    reduced: bool,

    config: ScanConfig,
}

impl<'a, O: ScanOps> GeneralScan<'a, O> {
    /// Create an engine with the default configuration.
    ///
    /// Fails unless `data.len()` is a power of two.
    pub fn new(data: &'a [O::Elem], ops: O) -> Result<Self, ScanError> {
        Self::with_config(data, ops, ScanConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(
        data: &'a [O::Elem],
        ops: O,
        config: ScanConfig,
    ) -> Result<Self, ScanError> {
        config.validate()?;
        let tree = TreeIndex::new(config.leaf_count(data.len())?);

        let mut interior = Vec::with_capacity(tree.interior_len());
        interior.resize_with(tree.interior_len(), OnceLock::new);

        debug!(
            len = data.len(),
            leaves = tree.leaves(),
            interior = tree.interior_len(),
            thread_budget = config.thread_budget,
            "constructed scan engine"
        );

        Ok(Self {
            data,
            ops,
            tree,
            interior,
            reduced: false,
            config,
        })
    }

    /// Reduction result at node `i` (level order, [`ROOT`] = whole input).
    ///
    /// Runs the full reduction on first use.
    pub fn get_reduction(&mut self, i: usize) -> Result<O::Output, ScanError> {
        if !self.tree.contains(i) {
            return Err(ScanError::InvalidNode {
                node: i,
                size: self.tree.size(),
            });
        }
        self.ensure_reduced();
        Ok(self.ops.gen(&self.tally(i)))
    }

    /// Reduction of the whole input.
    pub fn reduction(&mut self) -> Result<O::Output, ScanError> {
        self.get_reduction(ROOT)
    }

    /// Write the inclusive scan into `output`, which must have one slot per
    /// input element.
    pub fn get_scan(&mut self, output: &mut [O::Output]) -> Result<(), ScanError> {
        if output.len() != self.data.len() {
            return Err(ScanError::OutputLength {
                expected: self.data.len(),
                actual: output.len(),
            });
        }
        self.ensure_reduced();

        self.scan_node(ROOT, self.ops.identity(), output);
        debug!(len = output.len(), "scan complete");
        Ok(())
    }

    /// Inclusive scan collected into a new vector.
    pub fn scan(&mut self) -> Result<Vec<O::Output>, ScanError>
    where
        O::Output: Clone + Default,
    {
        let mut output = vec![O::Output::default(); self.data.len()];
        self.get_scan(&mut output)?;
        Ok(output)
    }

    /// Number of input elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Tree shape
    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    /// Configured thread budget
    pub fn thread_budget(&self) -> usize {
        self.config.thread_budget
    }

    /// OS threads available to forked work (the shared rayon pool)
    pub fn worker_threads(&self) -> usize {
        rayon::current_num_threads()
    }

    /// Whether the reduction has run
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Operation set
    pub fn ops(&self) -> &O {
        &self.ops
    }

    fn ensure_reduced(&mut self) {
        if self.reduced {
            return;
        }
        self.tally(ROOT);
        self.reduced = true;
        debug!(interior = self.tree.interior_len(), "reduction complete");
    }
}

impl<O: ScanOps + fmt::Debug> fmt::Debug for GeneralScan<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneralScan")
            .field("ops", &self.ops)
            .field("len", &self.data.len())
            .field("tree", &self.tree)
            .field("reduced", &self.reduced)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Padding;
    use crate::ops::{Max, Sum};

    #[test]
    fn test_lazy_reduction() {
        let data = [1i64, 2, 3, 4];
        let mut heap = GeneralScan::new(&data, Sum::new()).unwrap();
        assert!(!heap.is_reduced());
        assert_eq!(heap.reduction().unwrap(), 10);
        assert!(heap.is_reduced());
    }

    #[test]
    fn test_interior_reductions() {
        let data = [1i64, 2, 3, 4];
        let mut heap = GeneralScan::new(&data, Sum::new()).unwrap();
        assert_eq!(heap.get_reduction(1).unwrap(), 3);
        assert_eq!(heap.get_reduction(2).unwrap(), 7);
        // leaves
        assert_eq!(heap.get_reduction(3).unwrap(), 1);
        assert_eq!(heap.get_reduction(6).unwrap(), 4);
    }

    #[test]
    fn test_invalid_node_leaves_state_usable() {
        let data = [5i64; 8];
        let mut heap = GeneralScan::new(&data, Sum::new()).unwrap();
        let size = heap.tree().size();
        assert!(matches!(
            heap.get_reduction(size),
            Err(ScanError::InvalidNode { node: 15, size: 15 })
        ));
        assert!(!heap.is_reduced());
        assert_eq!(heap.reduction().unwrap(), 40);
    }

    #[test]
    fn test_scan_output_length_checked() {
        let data = [1i64, 2];
        let mut heap = GeneralScan::new(&data, Max::new()).unwrap();
        let mut out = vec![0i64; 3];
        assert!(matches!(
            heap.get_scan(&mut out),
            Err(ScanError::OutputLength { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_padded_engine() {
        let data = [1i64, 2, 3];
        let config = ScanConfig::new().with_padding(Padding::Identity);
        let mut heap = GeneralScan::with_config(&data, Sum::new(), config).unwrap();
        assert_eq!(heap.tree().leaves(), 4);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.reduction().unwrap(), 6);
        assert_eq!(heap.scan().unwrap(), vec![1, 3, 6]);
        // phantom leaf reduces to the identity
        assert_eq!(heap.get_reduction(6).unwrap(), 0);
    }

    #[test]
    fn test_huge_budget_small_input() {
        let data = [1i64, 2];
        let config = ScanConfig::new().with_thread_budget(2000);
        let mut heap = GeneralScan::with_config(&data, Sum::new(), config).unwrap();
        assert_eq!(heap.thread_budget(), 2000);
        assert_eq!(heap.reduction().unwrap(), 3);
        assert_eq!(heap.scan().unwrap(), vec![1, 3]);
        assert!(heap.worker_threads() < 2000);
    }

    #[cfg(target_os = "linux")]
    fn os_thread_count() -> usize {
        let status = std::fs::read_to_string("/proc/self/status").unwrap();
        status
            .lines()
            .find_map(|line| line.strip_prefix("Threads:"))
            .map(|n| n.trim().parse().unwrap())
            .unwrap()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_engines_do_not_spawn_budget_threads() {
        let data = [7i64; 4];
        let mut engines: Vec<_> = (0..4)
            .map(|_| {
                let config = ScanConfig::new().with_thread_budget(2000);
                GeneralScan::with_config(&data, Sum::new(), config).unwrap()
            })
            .collect();
        for heap in engines.iter_mut() {
            assert_eq!(heap.reduction().unwrap(), 28);
        }
        // all four engines still alive
        assert!(os_thread_count() < 2000);
        drop(engines);
    }

    #[test]
    fn test_debug_output() {
        let data = [1i64];
        let heap = GeneralScan::new(&data, Sum::<i64>::new()).unwrap();
        let text = format!("{:?}", heap);
        assert!(text.contains("GeneralScan"));
        assert!(text.contains("reduced: false"));
    }
}
