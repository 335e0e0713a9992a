//! Checkerboard and sub-lattice ranges of a node's storage.
//!
//! Storage on every node is split into 32 equal sub-lattices. The first 16
//! hold even sites and the last 16 odd sites, so a sweep over one parity is
//! a single contiguous range.

use crate::partitioning::PartitionPlan;
use crate::types::{GlobalCoordinate, LocalIndex, Parity, SUBLATTICES};
use std::ops::Range;

impl PartitionPlan {
    /// Checkerboard class of a site.
    ///
    /// This is the parity of the site's 2x2x2x2 cell within its block, the
    /// same bit that places the site in the lower or upper half of storage.
    #[inline]
    pub fn parity_of(&self, coord: GlobalCoordinate) -> Parity {
        let [xr, yr, zr, tr] = self.local_coords(coord);
        Parity::of(xr / 2 + yr / 2 + zr / 2 + tr / 2)
    }

    /// Checkerboard class of the site stored at `index`.
    #[inline]
    pub fn parity_of_index(&self, index: LocalIndex) -> Parity {
        if index < self.even_sites_on_node() {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Local indices holding sites of one parity.
    pub fn parity_range(&self, parity: Parity) -> Range<LocalIndex> {
        let even = self.even_sites_on_node();
        match parity {
            Parity::Even => 0..even,
            Parity::Odd => even..self.sites_on_node,
        }
    }

    /// Sub-lattice, `0..32`, holding the site stored at `index`.
    #[inline]
    pub fn sublattice_of(&self, index: LocalIndex) -> usize {
        index / self.subl_sites_on_node
    }

    /// Local indices of one sub-lattice.
    pub fn sublattice_range(&self, sublattice: usize) -> Range<LocalIndex> {
        debug_assert!(sublattice < SUBLATTICES, "sublattice {sublattice} out of range");
        let start = sublattice * self.subl_sites_on_node;
        start..start + self.subl_sites_on_node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioning::compute_plan;
    use crate::types::LatticeShape;

    #[test]
    fn test_parity_ranges_cover_storage() {
        let plan = compute_plan(LatticeShape::new(8, 8, 8, 8), 2).unwrap();
        let even = plan.parity_range(Parity::Even);
        let odd = plan.parity_range(Parity::Odd);

        assert_eq!(even, 0..1024);
        assert_eq!(odd, 1024..2048);
        assert_eq!(plan.parity_of_index(1023), Parity::Even);
        assert_eq!(plan.parity_of_index(1024), Parity::Odd);
    }

    #[test]
    fn test_sublattice_ranges() {
        let plan = compute_plan(LatticeShape::new(4, 4, 4, 4), 1).unwrap();
        assert_eq!(plan.sublattice_range(0), 0..8);
        assert_eq!(plan.sublattice_range(31), 248..256);
        assert_eq!(plan.sublattice_of(9), 1);
        assert_eq!(plan.sublattice_of(255), 31);
    }

    #[test]
    fn test_parity_matches_storage_half() {
        let plan = compute_plan(LatticeShape::new(8, 4, 4, 4), 2).unwrap();
        for coord in plan.shape().coordinates() {
            let index = plan.local_index_of(coord);
            assert_eq!(plan.parity_of(coord), plan.parity_of_index(index), "{coord}");
        }
    }

    #[test]
    fn test_fine_bits_do_not_change_parity() {
        let plan = compute_plan(LatticeShape::new(4, 4, 4, 4), 1).unwrap();
        assert_eq!(plan.parity_of(GlobalCoordinate::new(0, 0, 0, 0)), Parity::Even);
        assert_eq!(plan.parity_of(GlobalCoordinate::new(1, 1, 1, 0)), Parity::Even);
        assert_eq!(plan.parity_of(GlobalCoordinate::new(2, 0, 0, 0)), Parity::Odd);
        assert_eq!(plan.parity_of(GlobalCoordinate::new(3, 3, 0, 0)), Parity::Even);
    }
}
