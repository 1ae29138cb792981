//! Range queries.

use super::node::QuadTreeNode;
use crate::geometry::AxisAlignedBox;
use crate::object::Object;

/// How a range query decides whether to descend into a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pruning {
    /// Descend when the query box overlaps the node boundary. Complete.
    #[default]
    Overlap,
    /// Descend only when a corner of the query box lies in the node boundary
    /// ([`AxisAlignedBox::intersects`]). Nodes the query box fully encloses
    /// are skipped, so results can be incomplete.
    CornerProbe,
}

impl QuadTreeNode {
    /// Collect every stored object contained in `range`.
    ///
    /// Objects at a node come before those of its children, and children are
    /// visited in NW, NE, SW, SE order.
    pub fn query(&self, range: &AxisAlignedBox) -> Vec<Object> {
        self.query_with(range, Pruning::Overlap)
    }

    /// Range query with an explicit pruning rule.
    pub fn query_with(&self, range: &AxisAlignedBox, pruning: Pruning) -> Vec<Object> {
        let mut found = Vec::new();
        self.collect_in(range, pruning, &mut found);
        found
    }

    fn collect_in(&self, range: &AxisAlignedBox, pruning: Pruning, found: &mut Vec<Object>) {
        let reachable = match pruning {
            Pruning::Overlap => range.overlaps(self.boundary()),
            Pruning::CornerProbe => range.intersects(self.boundary()),
        };
        if !reachable {
            return;
        }

        found.extend(self.objects().iter().filter(|o| o.is_contained_in(range)).copied());

        if let Some(children) = self.children() {
            for child in children {
                child.collect_in(range, pruning, found);
            }
        }
    }
}
