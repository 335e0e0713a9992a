//! Configuration types for the layout engine.

use crate::error::{Error, Result};
use crate::types::{LatticeShape, DIMS};
use serde::{Deserialize, Serialize};

/// How the node grid is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStrategy {
    /// Derive the node grid by repeated bisection of the longest axis.
    #[default]
    Bisection,

    /// Use an externally supplied node grid (e.g. from a machine topology).
    FixedGrid([usize; DIMS]),
}

/// Main configuration for laying out a lattice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Global lattice extents.
    pub shape: LatticeShape,

    /// Number of nodes the lattice is spread over. Must be a power of two.
    pub node_count: usize,

    /// Node grid selection.
    pub strategy: LayoutStrategy,

    /// Number of I/O blocks along each axis. One I/O node sits at the
    /// origin of each block. Must divide the node grid.
    pub io_geometry: Option<[usize; DIMS]>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            shape: LatticeShape::new(4, 4, 4, 4),
            node_count: 1,
            strategy: LayoutStrategy::Bisection,
            io_geometry: None,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration for the given lattice and node count.
    pub fn new(shape: LatticeShape, node_count: usize) -> Self {
        Self {
            shape,
            node_count,
            ..Default::default()
        }
    }

    /// Set the node grid selection strategy.
    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use a fixed node grid. Also sets the node count to its product.
    pub fn with_node_grid(mut self, nsquares: [usize; DIMS]) -> Self {
        self.node_count = nsquares.iter().product();
        self.strategy = LayoutStrategy::FixedGrid(nsquares);
        self
    }

    /// Set the I/O partition grid.
    pub fn with_io_geometry(mut self, io_geometry: [usize; DIMS]) -> Self {
        self.io_geometry = Some(io_geometry);
        self
    }

    /// Check the configuration for obviously unusable values.
    ///
    /// Divisibility and power-of-two rules are enforced when the plan is
    /// built; this only catches zeros and inconsistent counts.
    pub fn validate(&self) -> Result<()> {
        if self.shape.as_array().contains(&0) {
            return Err(Error::Config(format!(
                "lattice extents must be positive, got {}",
                self.shape
            )));
        }
        if self.node_count == 0 {
            return Err(Error::Config("node count must be positive".into()));
        }
        if let LayoutStrategy::FixedGrid(nsquares) = self.strategy {
            let product: usize = nsquares.iter().product();
            if product != self.node_count {
                return Err(Error::Config(format!(
                    "node grid {nsquares:?} holds {product} nodes, expected {}",
                    self.node_count
                )));
            }
        }
        if let Some(io) = self.io_geometry {
            if io.contains(&0) {
                return Err(Error::Config(format!(
                    "I/O geometry entries must be positive, got {io:?}"
                )));
            }
        }
        Ok(())
    }
}
