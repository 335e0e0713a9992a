//! Per-node view of a plan.

use crate::error::{Error, Result};
use crate::partitioning::PartitionPlan;
use crate::types::{GlobalCoordinate, LocalIndex, NodeId, Parity};
use rayon::prelude::*;

/// The sites stored on one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeLayout<'a> {
    plan: &'a PartitionPlan,
    node: NodeId,
}

impl<'a> NodeLayout<'a> {
    /// View of `node` under `plan`.
    pub fn new(plan: &'a PartitionPlan, node: NodeId) -> Result<Self> {
        if node >= plan.node_count() {
            return Err(Error::InvalidArgument(format!(
                "node {node} outside 0..{}",
                plan.node_count()
            )));
        }
        Ok(Self { plan, node })
    }

    /// The node this view describes.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The underlying plan.
    pub fn plan(&self) -> &'a PartitionPlan {
        self.plan
    }

    /// Number of sites on this node.
    pub fn site_count(&self) -> usize {
        self.plan.site_count_on_node(self.node)
    }

    /// Lowest global coordinate owned by this node.
    pub fn origin(&self) -> GlobalCoordinate {
        self.plan.node_origin(self.node)
    }

    /// Whether this node owns `coord`.
    pub fn owns(&self, coord: GlobalCoordinate) -> bool {
        self.plan.shape().contains(coord) && self.plan.node_of(coord) == self.node
    }

    /// Global coordinate stored at `index`.
    pub fn coord(&self, index: LocalIndex) -> GlobalCoordinate {
        self.plan.coord_of(self.node, index)
    }

    /// Sites in storage order.
    pub fn sites(&self) -> impl Iterator<Item = (LocalIndex, GlobalCoordinate)> + 'a {
        let (plan, node) = (self.plan, self.node);
        (0..plan.sites_on_node()).map(move |i| (i, plan.coord_of(node, i)))
    }

    /// Sites of one parity in storage order.
    pub fn sites_with_parity(
        &self,
        parity: Parity,
    ) -> impl Iterator<Item = (LocalIndex, GlobalCoordinate)> + 'a {
        let (plan, node) = (self.plan, self.node);
        plan.parity_range(parity)
            .map(move |i| (i, plan.coord_of(node, i)))
    }

    /// Global coordinate of every local index, built in parallel.
    pub fn coordinate_table(&self) -> Vec<GlobalCoordinate> {
        let (plan, node) = (self.plan, self.node);
        (0..plan.sites_on_node())
            .into_par_iter()
            .map(|i| plan.coord_of(node, i))
            .collect()
    }
}

impl PartitionPlan {
    /// Views of every node, in node order.
    pub fn node_layouts(&self) -> impl Iterator<Item = NodeLayout<'_>> + '_ {
        self.nodes().map(move |node| NodeLayout { plan: self, node })
    }
}
