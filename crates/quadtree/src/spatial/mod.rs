//! Region quadtree.
//!
//! [`QuadTreeNode`] owns the tree structure and insertion; range queries live
//! in `query` and collision traversal in [`crate::collision`].

mod node;
mod query;

pub use node::{Nodes, QuadTreeNode, Quadrant};
pub use query::Pruning;
