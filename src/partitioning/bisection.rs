//! Node grid selection by recursive bisection.
//!
//! Starting from a single block covering the whole lattice, the block is
//! halved along one axis until there is one block per node. The axis is the
//! longest one that still has a spare factor of four, so blocks stay close to
//! hypercubic and later halvings remain even. Among equally long axes, one
//! that has already been split is preferred so the node grid spans as few
//! directions as possible.

use super::plan::PartitionPlan;
use crate::error::{LayoutError, Result};
use crate::types::{Direction, LatticeShape, DIMS};
use tracing::{debug, info, warn};

/// Compute the partition plan for `shape` spread over `node_count` nodes.
///
/// Fails with [`LayoutError::UnfactorizablePartition`] if the node count is
/// not a power of two or the lattice runs out of factors of two, and with
/// [`LayoutError::SublatticeAlignment`] if the resulting block cannot hold
/// 32 equal sub-lattices.
pub fn compute_plan(shape: LatticeShape, node_count: usize) -> Result<PartitionPlan> {
    let plan = bisect(shape, node_count)
        .and_then(|(squaresize, nsquares)| PartitionPlan::from_blocks(shape, squaresize, nsquares))
        .inspect_err(|err| warn!(error = %err, "Can't lay out this lattice"))?;

    info!(
        layout = "hypercubes, 32 sublattices",
        squaresize = ?plan.squaresize,
        nsquares = ?plan.nsquares,
        sites_on_node = plan.sites_on_node,
        "Laid out lattice {} on {} nodes",
        shape,
        node_count
    );
    Ok(plan)
}

/// Run the bisection search, returning `(squaresize, nsquares)`.
pub(crate) fn bisect(
    shape: LatticeShape,
    node_count: usize,
) -> std::result::Result<([usize; DIMS], [usize; DIMS]), LayoutError> {
    let unfactorizable = |reason: String| LayoutError::UnfactorizablePartition {
        shape: shape.as_array(),
        node_count,
        reason,
    };

    if shape.as_array().contains(&0) {
        return Err(unfactorizable("lattice extents must be positive".into()));
    }
    if !node_count.is_power_of_two() {
        return Err(unfactorizable("node count is not a power of two".into()));
    }

    let mut squaresize = shape.as_array();
    let mut nsquares = [1; DIMS];
    let mut placed = 1;

    while placed < node_count {
        let dir = split_direction(&squaresize, &nsquares).ok_or_else(|| {
            unfactorizable(format!(
                "not enough factors of 2 after placing {placed} blocks"
            ))
        })?;

        let d = dir.index();
        placed *= 2;
        squaresize[d] /= 2;
        nsquares[d] *= 2;
        debug!(
            direction = %dir,
            squaresize = ?squaresize,
            blocks = placed,
            "Bisected block"
        );
    }

    Ok((squaresize, nsquares))
}

/// Pick the axis to halve next, or `None` if no axis can be halved.
fn split_direction(squaresize: &[usize; DIMS], nsquares: &[usize; DIMS]) -> Option<Direction> {
    let longest_with = |factor: usize| {
        squaresize
            .iter()
            .copied()
            .filter(|&s| s >= factor && s % factor == 0)
            .max()
    };

    // Fall back to any even extent once no axis has a factor of four left.
    let target = longest_with(4).or_else(|| longest_with(2))?;

    Direction::ALL
        .into_iter()
        .find(|d| squaresize[d.index()] == target && nsquares[d.index()] > 1)
        .or_else(|| {
            Direction::ALL
                .into_iter()
                .find(|d| squaresize[d.index()] == target)
        })
}
