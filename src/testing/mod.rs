//! Testing utilities for layout plans.
//!
//! Provides exhaustive invariant checks usable from downstream test suites,
//! plus the crate's own cross-module tests.
//!
//! # Example
//!
//! ```rust
//! use hyperlayout::partitioning::compute_plan;
//! use hyperlayout::testing::{verify_bijection, verify_parity_ordering};
//! use hyperlayout::LatticeShape;
//!
//! let plan = compute_plan(LatticeShape::new(8, 8, 8, 8), 16).unwrap();
//! verify_bijection(&plan).unwrap();
//! verify_parity_ordering(&plan).unwrap();
//! ```

mod utils;

mod concurrency_tests;

pub use utils::{verify_bijection, verify_parity_ordering, STANDARD_LAYOUTS};
