//! Operation sets plugged into the reduce/scan engine
//!
//! An operation set is four pure functions over three types:
//!
//! ```text
//!   Elem --prepare--> Tally --combine--> Tally --gen--> Output
//!                       ^
//!                    identity
//! ```
//!
//! The engine knows nothing else about the computation. Sums, maxima,
//! "lowest k" merges and histograms differ only in their operation set.

mod arith;
mod histogram;
mod lowest;

pub use arith::{Bounded, Max, Min, Sum, Survival};
pub use histogram::{BucketCounts, Histogram};
pub use lowest::{AvgLowestK, Lowest, LowestK};

/// Trait implemented by every reduce/scan computation.
///
/// # Laws
///
/// Implementations must be pure (no observable side effects, no shared
/// mutable state) and satisfy, for all elements `x` and tallies `a, b, c`:
///
/// * identity: `combine(identity(), prepare(x)) == prepare(x)`
/// * associativity: `combine(combine(a, b), c) == combine(a, combine(b, c))`
///
/// The engine groups combinations by tree shape, so associativity is what
/// makes the answer independent of that grouping. Commutativity is expected
/// by convention (callers may reorder inputs) but never relied upon: the
/// engine always combines the left subtree's tally with the right
/// subtree's, in that order, whichever finishes first.
pub trait ScanOps: Send + Sync {
    /// Type of the read-only input elements.
    type Elem: Sync;
    /// Intermediate combination type.
    type Tally: Clone + Send + Sync;
    /// Externally visible result type.
    type Output: Send;

    /// Neutral element for [`combine`](ScanOps::combine).
    fn identity(&self) -> Self::Tally;

    /// Lift one input element into tally space.
    fn prepare(&self, elem: &Self::Elem) -> Self::Tally;

    /// Merge two tallies, `left` covering the earlier elements.
    fn combine(&self, left: &Self::Tally, right: &Self::Tally) -> Self::Tally;

    /// Project a finished tally into a result.
    fn gen(&self, tally: &Self::Tally) -> Self::Output;
}
