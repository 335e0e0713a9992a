//! The partition plan: per-node block shape and node grid shape.
//!
//! A plan is computed once at startup and shared read-only afterwards.
//! Every participant must derive the same plan; [`PartitionPlan::fingerprint`]
//! and the wire encoding let processes check that they agree.

use crate::error::{Error, LayoutError, Result};
use crate::types::{GlobalCoordinate, LatticeShape, NodeId, DIMS, SUBLATTICES};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use std::ops::Range;
use twox_hash::XxHash64;

/// Division of a lattice into equal hypercubic blocks, one per node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionPlan {
    pub(crate) shape: LatticeShape,
    pub(crate) squaresize: [usize; DIMS],
    pub(crate) nsquares: [usize; DIMS],
    pub(crate) sites_on_node: usize,
    pub(crate) subl_sites_on_node: usize,
}

impl PartitionPlan {
    /// Assemble a plan from a block shape.
    ///
    /// Checks that the blocks tile the lattice, that the node count is a
    /// power of two and that every block splits into 32 sub-lattices.
    pub(crate) fn from_blocks(
        shape: LatticeShape,
        squaresize: [usize; DIMS],
        nsquares: [usize; DIMS],
    ) -> std::result::Result<Self, LayoutError> {
        let extents = shape.as_array();
        let unfactorizable = |reason: String| LayoutError::UnfactorizablePartition {
            shape: extents,
            node_count: nsquares.iter().fold(1usize, |acc, &q| acc.saturating_mul(q)),
            reason,
        };

        if extents.contains(&0) {
            return Err(unfactorizable("lattice extents must be positive".into()));
        }
        let tiles =
            (0..DIMS).all(|d| squaresize[d].checked_mul(nsquares[d]) == Some(extents[d]));
        if !tiles {
            return Err(unfactorizable(format!(
                "blocks {squaresize:?} on grid {nsquares:?} don't tile the lattice"
            )));
        }
        match checked_product(nsquares) {
            Some(nodes) if nodes.is_power_of_two() => {}
            _ => {
                return Err(unfactorizable(format!(
                    "node grid {nsquares:?} is not a power of two"
                )))
            }
        }
        let sites_on_node = checked_product(squaresize)
            .ok_or_else(|| unfactorizable(format!("block {squaresize:?} is too large")))?;

        // Both parities are needed along every axis for the 4-bit parity code.
        let odd_extent = squaresize.iter().any(|&s| s % 2 != 0);
        if odd_extent || sites_on_node % SUBLATTICES != 0 {
            return Err(LayoutError::SublatticeAlignment {
                squaresize,
                sites_on_node,
            });
        }

        Ok(Self {
            shape,
            squaresize,
            nsquares,
            sites_on_node,
            subl_sites_on_node: sites_on_node / SUBLATTICES,
        })
    }

    /// Build a plan from an externally supplied node grid.
    ///
    /// No bisection search is run; the grid only has to divide the lattice,
    /// hold a power-of-two number of nodes, and leave blocks that split
    /// into 32 sub-lattices.
    pub fn from_node_grid(shape: LatticeShape, nsquares: [usize; DIMS]) -> Result<Self> {
        let extents = shape.as_array();
        let fits = extents
            .iter()
            .zip(nsquares.iter())
            .all(|(&n, &q)| q > 0 && n % q == 0);
        if !fits {
            let err = LayoutError::GridMismatch {
                shape: extents,
                nsquares,
            };
            tracing::warn!(error = %err, "Rejected fixed node grid");
            return Err(err.into());
        }

        let mut squaresize = [0; DIMS];
        for (d, size) in squaresize.iter_mut().enumerate() {
            *size = extents[d] / nsquares[d];
        }

        let plan = Self::from_blocks(shape, squaresize, nsquares).inspect_err(|err| {
            tracing::warn!(error = %err, "Rejected fixed node grid");
        })?;

        tracing::info!(
            layout = "fixed grid, 32 sublattices",
            squaresize = ?plan.squaresize,
            nsquares = ?plan.nsquares,
            sites_on_node = plan.sites_on_node,
            "Laid out lattice {}",
            shape
        );
        Ok(plan)
    }

    /// Global lattice extents.
    pub fn shape(&self) -> LatticeShape {
        self.shape
    }

    /// Per-node block extent along each direction.
    pub fn squaresize(&self) -> [usize; DIMS] {
        self.squaresize
    }

    /// Number of blocks along each direction.
    pub fn nsquares(&self) -> [usize; DIMS] {
        self.nsquares
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nsquares.iter().product()
    }

    /// All node ids.
    pub fn nodes(&self) -> Range<NodeId> {
        0..self.node_count()
    }

    /// Sites stored on every node.
    pub fn sites_on_node(&self) -> usize {
        self.sites_on_node
    }

    /// Sites in each of the 32 sub-lattices of a node.
    pub fn subl_sites_on_node(&self) -> usize {
        self.subl_sites_on_node
    }

    /// Even sites on every node.
    pub fn even_sites_on_node(&self) -> usize {
        self.sites_on_node / 2
    }

    /// Odd sites on every node.
    pub fn odd_sites_on_node(&self) -> usize {
        self.sites_on_node / 2
    }

    /// Block coordinates of a node in the node grid, x fastest.
    pub fn node_grid_coords(&self, node: NodeId) -> [usize; DIMS] {
        debug_assert!(node < self.node_count(), "node {node} out of range");
        unrank(node, self.nsquares)
    }

    /// Node at the given block coordinates.
    pub fn node_at_grid(&self, grid: [usize; DIMS]) -> NodeId {
        rank(grid, self.nsquares)
    }

    /// Lowest global coordinate owned by a node.
    pub fn node_origin(&self, node: NodeId) -> GlobalCoordinate {
        let grid = self.node_grid_coords(node);
        let mut origin = [0; DIMS];
        for (d, o) in origin.iter_mut().enumerate() {
            *o = grid[d] * self.squaresize[d];
        }
        GlobalCoordinate::from_array(origin)
    }

    /// Hash of the fields that define the plan.
    ///
    /// Values are hashed as `u64` so the fingerprint does not depend on the
    /// platform word size.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for value in self
            .shape
            .as_array()
            .iter()
            .chain(self.squaresize.iter())
            .chain(self.nsquares.iter())
        {
            hasher.write_u64(*value as u64);
        }
        hasher.finish()
    }

    /// Fail if a remote participant's fingerprint differs from ours.
    pub fn ensure_agrees(&self, remote: u64) -> Result<()> {
        let local = self.fingerprint();
        if local != remote {
            tracing::warn!(local, remote, "Partition plans disagree");
            return Err(Error::PlanMismatch { local, remote });
        }
        Ok(())
    }

    /// Serialize the plan for sending to other processes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a plan and re-derive it from its node grid.
    ///
    /// A decoded plan whose derived fields disagree with its shape and grid
    /// is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let decoded: PartitionPlan = bincode::deserialize(data)?;
        let rebuilt = Self::from_blocks(decoded.shape, decoded.squaresize, decoded.nsquares)
            .map_err(|err| Error::Serialization(format!("inconsistent plan: {err}")))?;
        if rebuilt != decoded {
            return Err(Error::Serialization(format!(
                "inconsistent plan: shape {}, squaresize {:?}, nsquares {:?}",
                decoded.shape, decoded.squaresize, decoded.nsquares
            )));
        }
        Ok(rebuilt)
    }
}

/// Product of all entries, or `None` on overflow.
fn checked_product(values: [usize; DIMS]) -> Option<usize> {
    values.iter().try_fold(1usize, |acc, &v| acc.checked_mul(v))
}

/// Mixed-radix encoding, first digit fastest.
#[inline]
pub(crate) fn rank(digits: [usize; DIMS], radices: [usize; DIMS]) -> usize {
    digits[0] + radices[0] * (digits[1] + radices[1] * (digits[2] + radices[2] * digits[3]))
}

/// Inverse of [`rank`].
#[inline]
pub(crate) fn unrank(mut value: usize, radices: [usize; DIMS]) -> [usize; DIMS] {
    let mut digits = [0; DIMS];
    for (digit, radix) in digits.iter_mut().zip(radices) {
        *digit = value % radix;
        value /= radix;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_8888_x2() -> PartitionPlan {
        PartitionPlan::from_node_grid(LatticeShape::new(8, 8, 8, 8), [2, 1, 1, 1]).unwrap()
    }

    #[test]
    fn test_rank_unrank() {
        let radices = [2, 3, 1, 4];
        for value in 0..24 {
            assert_eq!(rank(unrank(value, radices), radices), value);
        }
        assert_eq!(unrank(7, radices), [1, 0, 0, 1]);
    }

    #[test]
    fn test_from_node_grid() {
        let plan = plan_8888_x2();
        assert_eq!(plan.squaresize(), [4, 8, 8, 8]);
        assert_eq!(plan.node_count(), 2);
        assert_eq!(plan.sites_on_node(), 2048);
        assert_eq!(plan.subl_sites_on_node(), 64);
        assert_eq!(plan.even_sites_on_node(), 1024);
        assert_eq!(plan.odd_sites_on_node(), 1024);
    }

    #[test]
    fn test_from_node_grid_mismatch() {
        let err = PartitionPlan::from_node_grid(LatticeShape::new(8, 8, 8, 8), [3, 1, 1, 1])
            .unwrap_err();
        assert!(matches!(err, Error::Layout(LayoutError::GridMismatch { .. })));

        let err = PartitionPlan::from_node_grid(LatticeShape::new(8, 8, 8, 8), [0, 1, 1, 1])
            .unwrap_err();
        assert!(matches!(err, Error::Layout(LayoutError::GridMismatch { .. })));
    }

    #[test]
    fn test_from_node_grid_rejects_non_power_of_two() {
        let err = PartitionPlan::from_node_grid(LatticeShape::new(12, 8, 8, 8), [3, 1, 1, 1])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Layout(LayoutError::UnfactorizablePartition { node_count: 3, .. })
        ));
    }

    #[test]
    fn test_from_node_grid_rejects_zero_extent() {
        let err = PartitionPlan::from_node_grid(LatticeShape::new(8, 0, 8, 8), [2, 1, 1, 1])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Layout(LayoutError::UnfactorizablePartition { .. })
        ));
    }

    #[test]
    fn test_alignment_rejects_small_and_odd_blocks() {
        // 16 sites per node
        let err = PartitionPlan::from_node_grid(LatticeShape::new(4, 4, 4, 4), [2, 2, 2, 2])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Layout(LayoutError::SublatticeAlignment { sites_on_node: 16, .. })
        ));

        // 64 sites per node, but an odd x extent
        let err = PartitionPlan::from_blocks(LatticeShape::new(1, 4, 4, 4), [1, 4, 4, 4], [1; 4])
            .unwrap_err();
        assert!(matches!(err, LayoutError::SublatticeAlignment { .. }));
    }

    #[test]
    fn test_node_grid_and_origin() {
        let plan =
            PartitionPlan::from_node_grid(LatticeShape::new(8, 8, 8, 16), [2, 1, 2, 2]).unwrap();
        assert_eq!(plan.squaresize(), [4, 8, 4, 8]);
        assert_eq!(plan.node_grid_coords(5), [1, 0, 0, 1]);
        assert_eq!(plan.node_at_grid([1, 0, 0, 1]), 5);
        assert_eq!(plan.node_origin(5), GlobalCoordinate::new(4, 0, 0, 8));
        assert_eq!(plan.nodes(), 0..8);
    }

    #[test]
    fn test_fingerprint_agreement() {
        let a = plan_8888_x2();
        let b = plan_8888_x2();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(a.ensure_agrees(b.fingerprint()).is_ok());

        let other =
            PartitionPlan::from_node_grid(LatticeShape::new(8, 8, 8, 8), [1, 2, 1, 1]).unwrap();
        assert_ne!(a.fingerprint(), other.fingerprint());
        assert!(matches!(
            a.ensure_agrees(other.fingerprint()),
            Err(Error::PlanMismatch { .. })
        ));
    }

    #[test]
    fn test_wire_roundtrip() {
        let plan = plan_8888_x2();
        let bytes = plan.to_bytes().unwrap();
        let decoded = PartitionPlan::from_bytes(&bytes).unwrap();
        assert_eq!(plan, decoded);
    }

    #[test]
    fn test_wire_rejects_tampered_plan() {
        let mut plan = plan_8888_x2();
        plan.sites_on_node = 4096;
        let bytes = plan.to_bytes().unwrap();
        assert!(matches!(
            PartitionPlan::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));

        let mut plan = plan_8888_x2();
        plan.nsquares = [1, 1, 1, 1];
        let bytes = plan.to_bytes().unwrap();
        assert!(matches!(
            PartitionPlan::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));

        assert!(matches!(
            PartitionPlan::from_bytes(&[1, 2, 3]),
            Err(Error::Serialization(_))
        ));
    }

    /// Encode raw plan fields the way `bincode` lays out a `PartitionPlan`.
    fn raw_plan(
        shape: [u64; 4],
        squaresize: [u64; 4],
        nsquares: [u64; 4],
        sites: u64,
    ) -> Vec<u8> {
        bincode::serialize(&(shape, squaresize, nsquares, sites, sites / 32)).unwrap()
    }

    #[test]
    fn test_wire_rejects_overflowing_plan() {
        let huge = [1 << 32, 1 << 32, 2, 2];
        let bytes = raw_plan(huge, huge, [1; 4], 0);
        assert!(matches!(
            PartitionPlan::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));

        // Every block is small, but the node count overflows.
        let bytes = raw_plan(
            [1 << 40, 1 << 40, 2, 2],
            [2, 2, 2, 2],
            [1 << 39, 1 << 39, 1, 1],
            16,
        );
        assert!(matches!(
            PartitionPlan::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_wire_rejects_empty_plan() {
        let bytes = raw_plan([0, 4, 4, 4], [0, 4, 4, 4], [1; 4], 0);
        assert!(matches!(
            PartitionPlan::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));

        let bytes = raw_plan([0, 4, 4, 4], [0, 4, 4, 4], [0, 1, 1, 1], 0);
        assert!(matches!(
            PartitionPlan::from_bytes(&bytes),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_raw_plan_matches_encoding() {
        let plan = plan_8888_x2();
        let bytes = raw_plan([8; 4], [4, 8, 8, 8], [2, 1, 1, 1], 2048);
        assert_eq!(bytes, plan.to_bytes().unwrap());
    }
}
