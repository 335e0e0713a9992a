//! Partitioning module for distributing lattice sites across nodes.
//!
//! The lattice is cut into equal hypercubic blocks, one per node. The block
//! shape is found by repeated bisection or taken from a supplied node grid.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Partitioner                            │
//! │   LayoutConfig ──► Bisection | FixedGrid ──► PartitionPlan   │
//! │                                                 │            │
//! │                                                 ▼            │
//! │                                            IoPartition       │
//! └─────────────────────────────────────────────────────────────┘
//!
//!   8x8x8x8 on 4 nodes:
//!
//!   squaresize = 4x4x8x8      nsquares = 2x2x1x1
//!   ┌────┬────┐
//!   │ n0 │ n1 │  x ─►
//!   ├────┼────┤
//!   │ n2 │ n3 │  y ▼
//!   └────┴────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use hyperlayout::partitioning::compute_plan;
//! use hyperlayout::LatticeShape;
//!
//! let plan = compute_plan(LatticeShape::new(8, 8, 8, 8), 4).unwrap();
//! assert_eq!(plan.squaresize(), [4, 4, 8, 8]);
//! assert_eq!(plan.nsquares(), [2, 2, 1, 1]);
//! assert_eq!(plan.sites_on_node(), 1024);
//! ```

mod bisection;
mod io;
mod partitioner;
mod plan;

pub use bisection::compute_plan;
pub use io::IoPartition;
pub use partitioner::{Layout, Partitioner};
pub use plan::PartitionPlan;

pub(crate) use plan::{rank, unrank};
