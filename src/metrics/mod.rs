//! Metrics for plan construction.
//!
//! Only plan construction is instrumented. Site queries run millions of
//! times per sweep and carry no counters.
//!
//! # Example
//!
//! ```rust
//! use hyperlayout::{LatticeShape, LayoutConfig, Partitioner};
//!
//! let partitioner = Partitioner::new(LayoutConfig::new(LatticeShape::new(8, 8, 8, 8), 2));
//! partitioner.plan().unwrap();
//!
//! let snapshot = partitioner.metrics().snapshot();
//! assert_eq!(snapshot.plans_computed, 1);
//! assert_eq!(snapshot.sites_on_node, 2048);
//! ```

mod counters;
mod gauges;

pub use counters::{Counter, LabeledCounter};
pub use gauges::Gauge;

use crate::error::Error;
use crate::partitioning::PartitionPlan;
use std::fmt::Write;

/// Counters and gauges describing the plans a process has built.
#[derive(Debug)]
pub struct LayoutMetrics {
    /// Plans built successfully.
    pub plans_computed: Counter,
    /// Plans rejected, by error kind.
    pub plans_rejected: LabeledCounter<1>,
    /// Block halvings performed by the bisection search.
    pub bisections: Counter,
    /// Sites per node of the latest plan.
    pub sites_on_node: Gauge,
    /// Node count of the latest plan.
    pub node_count: Gauge,
}

impl LayoutMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self {
            plans_computed: Counter::new("layout_plans_computed_total", "Partition plans built"),
            plans_rejected: LabeledCounter::new(
                "layout_plans_rejected_total",
                "Partition plans rejected",
                ["reason"],
            ),
            bisections: Counter::new("layout_bisections_total", "Block halvings performed"),
            sites_on_node: Gauge::new("layout_sites_on_node", "Sites per node in the latest plan"),
            node_count: Gauge::new("layout_node_count", "Nodes in the latest plan"),
        }
    }

    /// Record a successfully built plan.
    pub fn record_plan(&self, plan: &PartitionPlan, bisections: u64) {
        self.plans_computed.inc();
        self.bisections.inc_by(bisections);
        self.sites_on_node.set(plan.sites_on_node() as i64);
        self.node_count.set(plan.node_count() as i64);
    }

    /// Record a rejected plan.
    pub fn record_rejection(&self, error: &Error) {
        let reason = match error {
            Error::Layout(err) => err.kind(),
            Error::Config(_) => "config",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::Serialization(_) => "serialization",
            Error::PlanMismatch { .. } => "plan_mismatch",
        };
        self.plans_rejected.inc([reason]);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plans_computed: self.plans_computed.get(),
            plans_rejected: self.plans_rejected.get_all().iter().map(|(_, v)| v).sum(),
            bisections: self.bisections.get(),
            sites_on_node: self.sites_on_node.get(),
            node_count: self.node_count.get(),
        }
    }

    /// Format metrics in Prometheus exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();

        for counter in [&self.plans_computed, &self.bisections] {
            let _ = writeln!(out, "# HELP {} {}", counter.name(), counter.help());
            let _ = writeln!(out, "# TYPE {} counter", counter.name());
            let _ = writeln!(out, "{} {}", counter.name(), counter.get());
        }

        let rejected = &self.plans_rejected;
        let _ = writeln!(out, "# HELP {} {}", rejected.name(), rejected.help());
        let _ = writeln!(out, "# TYPE {} counter", rejected.name());
        for ([reason], value) in rejected.get_all() {
            let _ = writeln!(
                out,
                "{}{{{}=\"{}\"}} {}",
                rejected.name(),
                rejected.label_names()[0],
                reason,
                value
            );
        }

        for gauge in [&self.sites_on_node, &self.node_count] {
            let _ = writeln!(out, "# HELP {} {}", gauge.name(), gauge.help());
            let _ = writeln!(out, "# TYPE {} gauge", gauge.name());
            let _ = writeln!(out, "{} {}", gauge.name(), gauge.get());
        }

        out
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`LayoutMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub plans_computed: u64,
    pub plans_rejected: u64,
    pub bisections: u64,
    pub sites_on_node: i64,
    pub node_count: i64,
}
