//! Implicit binary tree over the input
//!
//! No explicit tree is stored: node ids are dense level-order integers
//! and all navigation is arithmetic on the leaf count.

mod index;

pub use index::TreeIndex;

/// Node id of the root
pub const ROOT: usize = 0;
