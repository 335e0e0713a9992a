//! Forward and inverse site queries.
//!
//! These run once per site per sweep, so the unchecked forms only
//! `debug_assert!` their preconditions. The `checked_*` forms validate and
//! return [`Error::InvalidArgument`].

use crate::error::{Error, Result};
use crate::partitioning::{rank, unrank, PartitionPlan};
use crate::types::{GlobalCoordinate, LocalIndex, NodeId, DIMS};

impl PartitionPlan {
    /// Node that owns `coord`.
    #[inline]
    pub fn node_of(&self, coord: GlobalCoordinate) -> NodeId {
        debug_assert!(
            self.shape.contains(coord),
            "{coord} outside lattice {}",
            self.shape
        );
        let c = coord.as_array();
        let s = self.squaresize;
        rank(
            [c[0] / s[0], c[1] / s[1], c[2] / s[2], c[3] / s[3]],
            self.nsquares,
        )
    }

    /// Position of `coord` within its node's block.
    #[inline]
    pub fn local_coords(&self, coord: GlobalCoordinate) -> [usize; DIMS] {
        let c = coord.as_array();
        let s = self.squaresize;
        [c[0] % s[0], c[1] % s[1], c[2] % s[2], c[3] % s[3]]
    }

    /// Storage offset of `coord` within its node.
    ///
    /// The offset is `half / 2 + key * subl_sites_on_node`, where `half`
    /// indexes the site's 2x2x2x2 cell in the block, the low four bits of
    /// `key` are the low bits of the block-local coordinates, and bit 4 is
    /// the parity of the cell coordinate sum. Downstream readers depend on
    /// this exact layout.
    #[inline]
    pub fn local_index_of(&self, coord: GlobalCoordinate) -> LocalIndex {
        debug_assert!(
            self.shape.contains(coord),
            "{coord} outside lattice {}",
            self.shape
        );
        let [xr, yr, zr, tr] = self.local_coords(coord);
        let s = self.squaresize;

        let half =
            (xr / 2) + (s[0] / 2) * ((yr / 2) + (s[1] / 2) * ((zr / 2) + (s[2] / 2) * (tr / 2)));
        let mut key = (xr % 2) + 2 * (yr % 2) + 4 * (zr % 2) + 8 * (tr % 2);
        key += 16 * ((xr / 2 + yr / 2 + zr / 2 + tr / 2) % 2);

        half / 2 + key * self.subl_sites_on_node
    }

    /// Global coordinate stored at `index` on `node`.
    ///
    /// Inverse of [`node_of`](Self::node_of) and
    /// [`local_index_of`](Self::local_index_of).
    pub fn coord_of(&self, node: NodeId, index: LocalIndex) -> GlobalCoordinate {
        debug_assert!(node < self.node_count(), "node {node} out of range");
        debug_assert!(index < self.sites_on_node, "index {index} out of range");

        let key = index / self.subl_sites_on_node;
        let pair = index % self.subl_sites_on_node;
        let s = self.squaresize;
        let cells = [s[0] / 2, s[1] / 2, s[2] / 2, s[3] / 2];

        // Cells 2*pair and 2*pair+1 have opposite coordinate-sum parity;
        // the checkerboard bit of the key picks one.
        let checkerboard = key >> 4;
        let mut cell = unrank(2 * pair, cells);
        if cell.iter().sum::<usize>() % 2 != checkerboard {
            cell = unrank(2 * pair + 1, cells);
        }

        let grid = unrank(node, self.nsquares);
        let mut coord = [0; DIMS];
        for (d, c) in coord.iter_mut().enumerate() {
            *c = grid[d] * s[d] + 2 * cell[d] + ((key >> d) & 1);
        }
        GlobalCoordinate::from_array(coord)
    }

    /// Number of sites stored on `node`. Identical for every node.
    #[inline]
    pub fn site_count_on_node(&self, node: NodeId) -> usize {
        debug_assert!(node < self.node_count(), "node {node} out of range");
        self.sites_on_node
    }

    /// [`node_of`](Self::node_of) with range checking.
    pub fn checked_node_of(&self, coord: GlobalCoordinate) -> Result<NodeId> {
        self.check_coord(coord)?;
        Ok(self.node_of(coord))
    }

    /// [`local_index_of`](Self::local_index_of) with range checking.
    pub fn checked_local_index_of(&self, coord: GlobalCoordinate) -> Result<LocalIndex> {
        self.check_coord(coord)?;
        Ok(self.local_index_of(coord))
    }

    /// [`coord_of`](Self::coord_of) with range checking.
    pub fn checked_coord_of(&self, node: NodeId, index: LocalIndex) -> Result<GlobalCoordinate> {
        self.check_node(node)?;
        if index >= self.sites_on_node {
            return Err(Error::InvalidArgument(format!(
                "local index {index} outside 0..{}",
                self.sites_on_node
            )));
        }
        Ok(self.coord_of(node, index))
    }

    /// [`site_count_on_node`](Self::site_count_on_node) with range checking.
    pub fn checked_site_count_on_node(&self, node: NodeId) -> Result<usize> {
        self.check_node(node)?;
        Ok(self.sites_on_node)
    }

    fn check_coord(&self, coord: GlobalCoordinate) -> Result<()> {
        if !self.shape.contains(coord) {
            return Err(Error::InvalidArgument(format!(
                "coordinate {coord} outside lattice {}",
                self.shape
            )));
        }
        Ok(())
    }

    fn check_node(&self, node: NodeId) -> Result<()> {
        if node >= self.node_count() {
            return Err(Error::InvalidArgument(format!(
                "node {node} outside 0..{}",
                self.node_count()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::compute_plan;
    use crate::types::LatticeShape;
    use std::collections::HashSet;

    fn single_node() -> PartitionPlan {
        compute_plan(LatticeShape::new(4, 4, 4, 4), 1).unwrap()
    }

    #[test]
    fn test_origin_is_index_zero() {
        let plan = single_node();
        assert_eq!(plan.node_of(GlobalCoordinate::ORIGIN), 0);
        assert_eq!(plan.local_index_of(GlobalCoordinate::ORIGIN), 0);
        assert_eq!(plan.coord_of(0, 0), GlobalCoordinate::ORIGIN);
    }

    #[test]
    fn test_known_offsets() {
        // 4^4 block: subl_sites_on_node = 8, cells are 2x2x2x2.
        let plan = single_node();
        // Fine bit x set, cell 0: key 1.
        assert_eq!(plan.local_index_of(GlobalCoordinate::new(1, 0, 0, 0)), 8);
        // Cell (1,0,0,0): half 1, odd cell sum: key 16.
        assert_eq!(plan.local_index_of(GlobalCoordinate::new(2, 0, 0, 0)), 128);
        // Cell (1,1,0,0): half 3, even cell sum: key 0.
        assert_eq!(plan.local_index_of(GlobalCoordinate::new(2, 2, 0, 0)), 1);
        // All fine bits set in the last cell (1,1,1,1): half 15, key 15.
        assert_eq!(plan.local_index_of(GlobalCoordinate::new(3, 3, 3, 3)), 7 + 15 * 8);
    }

    #[test]
    fn test_node_of_mixed_radix() {
        let plan = compute_plan(LatticeShape::new(8, 8, 8, 8), 16).unwrap();
        assert_eq!(plan.node_of(GlobalCoordinate::new(4, 0, 0, 0)), 1);
        assert_eq!(plan.node_of(GlobalCoordinate::new(0, 4, 0, 0)), 2);
        assert_eq!(plan.node_of(GlobalCoordinate::new(0, 0, 4, 0)), 4);
        assert_eq!(plan.node_of(GlobalCoordinate::new(7, 7, 7, 7)), 15);
    }

    #[test]
    fn test_bijection_single_node() {
        let plan = single_node();
        let mut seen = HashSet::new();
        for coord in plan.shape().coordinates() {
            let index = plan.local_index_of(coord);
            assert!(index < plan.sites_on_node());
            assert!(seen.insert(index), "duplicate index {index} for {coord}");
            assert_eq!(plan.coord_of(0, index), coord);
        }
        assert_eq!(seen.len(), 256);
    }

    #[test]
    fn test_block_extent_two_mod_four() {
        // squaresize [2, 4, 4, 4]: cells along x are a single column.
        let plan = PartitionPlan::from_node_grid(LatticeShape::new(4, 4, 4, 4), [2, 1, 1, 1])
            .unwrap();
        for coord in plan.shape().coordinates() {
            let node = plan.node_of(coord);
            let index = plan.local_index_of(coord);
            assert_eq!(plan.coord_of(node, index), coord);
        }
    }

    #[test]
    fn test_checked_queries() {
        let plan = single_node();
        let outside = GlobalCoordinate::new(4, 0, 0, 0);

        assert!(matches!(
            plan.checked_node_of(outside),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plan.checked_local_index_of(outside),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plan.checked_coord_of(1, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plan.checked_coord_of(0, 256),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            plan.checked_site_count_on_node(1),
            Err(Error::InvalidArgument(_))
        ));

        let inside = GlobalCoordinate::new(3, 2, 1, 0);
        let index = plan.checked_local_index_of(inside).unwrap();
        assert_eq!(plan.checked_node_of(inside).unwrap(), 0);
        assert_eq!(plan.checked_coord_of(0, index).unwrap(), inside);
        assert_eq!(plan.checked_site_count_on_node(0).unwrap(), 256);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside lattice")]
    fn test_debug_asserts_coordinate_range() {
        let plan = single_node();
        plan.node_of(GlobalCoordinate::new(0, 0, 0, 4));
    }
}
