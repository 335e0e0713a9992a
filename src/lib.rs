//! Domain decomposition and site indexing for 4D lattice simulations.
//!
//! This crate divides a hypercubic lattice among a power-of-two number of
//! nodes and maps every lattice site to a storage slot on its owning node:
//! - **Bisection** finds an equal block shape for every node
//! - **Fixed grids** accept an externally chosen node grid instead
//! - **Site indexing** stores each node's sites as 32 sub-lattices, even
//!   checkerboard sites first
//!
//! # Features
//!
//! - Deterministic plans: every process derives the same layout
//! - Constant-time forward and inverse site queries
//! - Plan fingerprints and a wire encoding for cross-process agreement
//! - I/O node assignment over rectangular groups of nodes
//!
//! # Example
//!
//! ```rust
//! use hyperlayout::{GlobalCoordinate, LatticeShape, LayoutConfig, Partitioner};
//!
//! let config = LayoutConfig::new(LatticeShape::new(8, 8, 8, 8), 4);
//! let layout = Partitioner::new(config).build().unwrap();
//! let plan = &layout.plan;
//!
//! let site = GlobalCoordinate::new(5, 3, 7, 2);
//! let node = plan.node_of(site);
//! let index = plan.local_index_of(site);
//! assert_eq!(plan.coord_of(node, index), site);
//! assert_eq!(plan.site_count_on_node(node), 1024);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        Solvers, lattice I/O, messaging      │
//! └─────────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────────┐
//! │               Site queries                  │
//! │  • node_of(coord) -> NodeId                 │
//! │  • local_index_of(coord) -> LocalIndex      │
//! │  • coord_of(node, index) -> GlobalCoordinate│
//! │  • site_count_on_node(node) -> usize        │
//! └─────────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────────┐
//! │   PartitionPlan (squaresize, nsquares)      │
//! └─────────────────────────────────────────────┘
//!                     ▲
//!     ┌───────────────┴───────────────┐
//! ┌─────────┐                   ┌───────────┐
//! │Bisection│                   │Fixed grid │
//! └─────────┘                   └───────────┘
//! ```
//!
//! # Agreement
//!
//! Each process computes its plan independently. Exchange
//! [`PartitionPlan::fingerprint`] values (or the bytes from
//! [`PartitionPlan::to_bytes`]) at startup and call
//! [`PartitionPlan::ensure_agrees`] to catch mismatched inputs before any
//! data moves.

pub mod config;
pub mod error;
pub mod indexing;
pub mod metrics;
pub mod partitioning;
pub mod testing;
pub mod types;

// Re-export main types for convenience
pub use config::{LayoutConfig, LayoutStrategy};
pub use error::{Error, LayoutError, Result};
pub use types::{
    Direction, GlobalCoordinate, LatticeShape, LocalIndex, NodeId, Parity, DIMS, SUBLATTICES,
};

// Re-export partitioning types
pub use partitioning::{compute_plan, IoPartition, Layout, PartitionPlan, Partitioner};

// Re-export indexing types
pub use indexing::{coord_of, local_index_of, node_of, site_count_on_node, NodeLayout};

// Re-export metrics types
pub use metrics::{Counter, Gauge, LabeledCounter, LayoutMetrics, MetricsSnapshot};
