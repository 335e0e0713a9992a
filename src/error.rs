//! Error types for the layout engine.
//!
//! All layout failures are detected while building a [`PartitionPlan`];
//! queries against a plan never fail except through the `checked_*` variants.
//!
//! [`PartitionPlan`]: crate::partitioning::PartitionPlan

use thiserror::Error;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the layout engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The lattice cannot be laid out on the requested nodes.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),

    /// A query argument lies outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A plan could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Two participants computed different plans.
    #[error("plan mismatch: local fingerprint {local:#018x}, remote {remote:#018x}")]
    PlanMismatch { local: u64, remote: u64 },
}

/// Static layout failures, fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The node count cannot be reached by halving the lattice.
    #[error("can't lay out {shape:?} on {node_count} nodes: {reason}")]
    UnfactorizablePartition {
        shape: [usize; 4],
        node_count: usize,
        reason: String,
    },

    /// The per-node block does not split into 32 equal sub-lattices.
    #[error("block {squaresize:?} with {sites_on_node} sites can't hold 32 sub-lattices")]
    SublatticeAlignment {
        squaresize: [usize; 4],
        sites_on_node: usize,
    },

    /// A supplied node grid does not fit the lattice.
    #[error("lattice {shape:?} doesn't fit node grid {nsquares:?}")]
    GridMismatch {
        shape: [usize; 4],
        nsquares: [usize; 4],
    },

    /// A supplied I/O grid does not fit the node grid.
    #[error("node grid {nsquares:?} doesn't fit I/O grid {io_geometry:?}")]
    IoGridMismatch {
        nsquares: [usize; 4],
        io_geometry: [usize; 4],
    },
}

impl LayoutError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::UnfactorizablePartition { .. } => "unfactorizable",
            LayoutError::SublatticeAlignment { .. } => "sublattice_alignment",
            LayoutError::GridMismatch { .. } => "grid_mismatch",
            LayoutError::IoGridMismatch { .. } => "io_grid_mismatch",
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
