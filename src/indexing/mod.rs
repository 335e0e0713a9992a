//! Site indexing: which node owns a site and where it lives in that node's
//! storage.
//!
//! Each node's block is divided into 2x2x2x2 cells. A site's storage offset
//! combines three parts:
//!
//! ```text
//!   index = half / 2 + key * subl_sites_on_node
//!
//!   half  = mixed-radix index of the site's cell within the block
//!   key   = (xr & 1) | (yr & 1) << 1 | (zr & 1) << 2 | (tr & 1) << 3
//!         | ((xr/2 + yr/2 + zr/2 + tr/2) & 1) << 4
//! ```
//!
//! so storage holds 32 sub-lattices of `sites_on_node / 32` sites, with all
//! even-cell sites in the first half.
//!
//! The free functions below are the interface consumed by solvers, I/O and
//! message passing; they forward to methods on [`PartitionPlan`].

mod node;
mod parity;
mod site;

pub use node::NodeLayout;

use crate::partitioning::PartitionPlan;
use crate::types::{GlobalCoordinate, LocalIndex, NodeId};

/// Node that owns `coord`.
#[inline]
pub fn node_of(plan: &PartitionPlan, coord: GlobalCoordinate) -> NodeId {
    plan.node_of(coord)
}

/// Storage offset of `coord` within its node.
#[inline]
pub fn local_index_of(plan: &PartitionPlan, coord: GlobalCoordinate) -> LocalIndex {
    plan.local_index_of(coord)
}

/// Global coordinate stored at `index` on `node`.
#[inline]
pub fn coord_of(plan: &PartitionPlan, node: NodeId, index: LocalIndex) -> GlobalCoordinate {
    plan.coord_of(node, index)
}

/// Number of sites stored on `node`.
#[inline]
pub fn site_count_on_node(plan: &PartitionPlan, node: NodeId) -> usize {
    plan.site_count_on_node(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::compute_plan;
    use crate::types::LatticeShape;

    #[test]
    fn test_free_functions_forward() {
        let plan = compute_plan(LatticeShape::new(8, 8, 8, 8), 2).unwrap();
        let coord = GlobalCoordinate::new(5, 3, 7, 2);

        let node = node_of(&plan, coord);
        let index = local_index_of(&plan, coord);
        assert_eq!(node, 1);
        assert_eq!(coord_of(&plan, node, index), coord);
        assert_eq!(site_count_on_node(&plan, node), 2048);
    }
}
