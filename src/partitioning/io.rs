//! I/O partitions over the node grid.
//!
//! The node grid is cut into `io_geometry` equal blocks of nodes. The node
//! owning the origin of each block handles file I/O for every node in it.

use super::plan::{rank, unrank, PartitionPlan};
use crate::error::{LayoutError, Result};
use crate::types::{NodeId, DIMS};

/// Assignment of nodes to I/O nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoPartition {
    /// Node grid shape of the plan this partition was built for.
    nsquares: [usize; DIMS],
    /// Number of I/O blocks along each axis.
    io_geometry: [usize; DIMS],
    /// Nodes per I/O block along each axis.
    block: [usize; DIMS],
}

impl IoPartition {
    /// Create an I/O partition for `plan`.
    ///
    /// Every entry of `io_geometry` must be positive and divide the node
    /// grid extent along its axis.
    pub fn new(plan: &PartitionPlan, io_geometry: [usize; DIMS]) -> Result<Self> {
        let nsquares = plan.nsquares();
        let fits = nsquares
            .iter()
            .zip(io_geometry.iter())
            .all(|(&n, &io)| io > 0 && n % io == 0);
        if !fits {
            let err = LayoutError::IoGridMismatch {
                nsquares,
                io_geometry,
            };
            tracing::warn!(error = %err, "Rejected I/O geometry");
            return Err(err.into());
        }

        let mut block = [0; DIMS];
        for (d, b) in block.iter_mut().enumerate() {
            *b = nsquares[d] / io_geometry[d];
        }

        tracing::info!(
            io_geometry = ?io_geometry,
            nodes_per_io_block = block.iter().product::<usize>(),
            "Configured I/O partitions"
        );

        Ok(Self {
            nsquares,
            io_geometry,
            block,
        })
    }

    /// One I/O node for the whole machine.
    pub fn single(plan: &PartitionPlan) -> Self {
        Self {
            nsquares: plan.nsquares(),
            io_geometry: [1; DIMS],
            block: plan.nsquares(),
        }
    }

    /// Number of I/O blocks along each axis.
    pub fn io_geometry(&self) -> [usize; DIMS] {
        self.io_geometry
    }

    /// Total number of I/O nodes.
    pub fn io_node_count(&self) -> usize {
        self.io_geometry.iter().product()
    }

    /// The I/O node serving `node`.
    pub fn io_node_of(&self, node: NodeId) -> NodeId {
        let mut grid = unrank(node, self.nsquares);
        for (g, b) in grid.iter_mut().zip(self.block) {
            *g -= *g % b;
        }
        rank(grid, self.nsquares)
    }

    /// Whether `node` is an I/O node.
    pub fn is_io_node(&self, node: NodeId) -> bool {
        self.io_node_of(node) == node
    }

    /// All I/O nodes, ascending.
    pub fn io_nodes(&self) -> Vec<NodeId> {
        let node_count: usize = self.nsquares.iter().product();
        (0..node_count).filter(|&n| self.is_io_node(n)).collect()
    }
}
