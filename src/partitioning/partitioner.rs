//! Startup entry point: turn a [`LayoutConfig`] into a plan.

use super::bisection::compute_plan;
use super::io::IoPartition;
use super::plan::PartitionPlan;
use crate::config::{LayoutConfig, LayoutStrategy};
use crate::error::Result;
use crate::metrics::LayoutMetrics;
use std::sync::Arc;

/// A plan together with its I/O partition.
#[derive(Debug, Clone)]
pub struct Layout {
    /// The node grid and per-node block.
    pub plan: PartitionPlan,
    /// I/O node assignment. A single I/O node unless configured otherwise.
    pub io: IoPartition,
}

/// Builds partition plans from configuration and records metrics.
#[derive(Debug)]
pub struct Partitioner {
    config: LayoutConfig,
    metrics: Arc<LayoutMetrics>,
}

impl Partitioner {
    /// Create a partitioner with its own metrics.
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_metrics(config, Arc::new(LayoutMetrics::new()))
    }

    /// Create a partitioner that records into shared metrics.
    pub fn with_metrics(config: LayoutConfig, metrics: Arc<LayoutMetrics>) -> Self {
        Self { config, metrics }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Get the metrics.
    pub fn metrics(&self) -> &Arc<LayoutMetrics> {
        &self.metrics
    }

    /// Build the partition plan using the configured strategy.
    pub fn plan(&self) -> Result<PartitionPlan> {
        let result = self.config.validate().and_then(|()| match self.config.strategy {
            LayoutStrategy::Bisection => compute_plan(self.config.shape, self.config.node_count),
            LayoutStrategy::FixedGrid(nsquares) => {
                PartitionPlan::from_node_grid(self.config.shape, nsquares)
            }
        });

        match &result {
            Ok(plan) => {
                let bisections = match self.config.strategy {
                    LayoutStrategy::Bisection => u64::from(plan.node_count().trailing_zeros()),
                    LayoutStrategy::FixedGrid(_) => 0,
                };
                self.metrics.record_plan(plan, bisections);
            }
            Err(err) => self.metrics.record_rejection(err),
        }
        result
    }

    /// Build the plan and its I/O partition.
    pub fn build(&self) -> Result<Layout> {
        let plan = self.plan()?;
        let io = match self.config.io_geometry {
            Some(io_geometry) => IoPartition::new(&plan, io_geometry)
                .inspect_err(|err| self.metrics.record_rejection(err))?,
            None => IoPartition::single(&plan),
        };
        Ok(Layout { plan, io })
    }
}
