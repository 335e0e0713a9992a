//! Exhaustive layout checks and standard test lattices.

use crate::partitioning::PartitionPlan;
use crate::types::{NodeId, Parity};

/// Lattice extents and node counts that lay out successfully.
pub const STANDARD_LAYOUTS: &[([usize; 4], usize)] = &[
    ([4, 4, 4, 4], 1),
    ([4, 4, 4, 4], 2),
    ([4, 4, 4, 4], 4),
    ([4, 4, 4, 8], 8),
    ([8, 8, 8, 8], 2),
    ([8, 8, 8, 8], 16),
    ([8, 4, 4, 16], 8),
    ([16, 8, 4, 4], 4),
    ([8, 8, 8, 4], 32),
];

/// Check that every site maps to a distinct `(node, index)` pair in range
/// and that [`PartitionPlan::coord_of`] inverts the mapping.
///
/// Visits every site, so only use on small lattices.
pub fn verify_bijection(plan: &PartitionPlan) -> Result<(), String> {
    let sites = plan.sites_on_node();
    let mut owner: Vec<Option<(NodeId, usize)>> = vec![None; plan.node_count() * sites];

    for coord in plan.shape().coordinates() {
        let node = plan.node_of(coord);
        let index = plan.local_index_of(coord);
        if node >= plan.node_count() || index >= sites {
            return Err(format!("{coord} maps outside storage: node {node}, index {index}"));
        }

        let slot = &mut owner[node * sites + index];
        if slot.is_some() {
            return Err(format!("{coord} collides at node {node}, index {index}"));
        }
        *slot = Some((node, index));

        let back = plan.coord_of(node, index);
        if back != coord {
            return Err(format!("{coord} -> ({node}, {index}) -> {back}"));
        }
    }

    match owner.iter().position(Option::is_none) {
        Some(slot) => Err(format!(
            "node {} index {} holds no site",
            slot / sites,
            slot % sites
        )),
        None => Ok(()),
    }
}

/// Check that even sites fill the lower half of every node's storage and
/// odd sites the upper half.
pub fn verify_parity_ordering(plan: &PartitionPlan) -> Result<(), String> {
    for node in plan.nodes() {
        for parity in Parity::ALL {
            for index in plan.parity_range(parity) {
                let coord = plan.coord_of(node, index);
                if plan.parity_of(coord) != parity {
                    return Err(format!(
                        "node {node} index {index} holds {coord}, expected {parity}"
                    ));
                }
            }
        }
    }
    Ok(())
}
