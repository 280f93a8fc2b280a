use std::collections::HashSet;

use graphviz_rust::dot_structures::Graph;

use super::{
    color_scheme::ColorScheme,
    descriptors::{EdgeDescriptor, NodeDescriptor},
    graph_builder::{GraphBuilder, QuantityGraphError},
    options::GraphOptions,
};
use crate::core::process_models::quantity_net::QuantityNet;

#[derive(Debug, Clone, Default)]
///
/// Graphviz graph of a [`GraphDescriptor`]
///
/// Starts out [`GraphHandle::Empty`] and is built lazily on the first export.
pub enum GraphHandle {
    /// No graph built (yet)
    #[default]
    Empty,
    /// Graph built from the current descriptors
    Built(Graph),
}

#[derive(Debug, Clone)]
///
/// All node and edge descriptors of one quantity net snapshot
///
/// Created by [`GraphBuilder::build`]. The descriptor sets are never changed in place:
/// use [`GraphDescriptor::rebuild`] to draw another snapshot (or the same snapshot with a different `marked` flag).
pub struct GraphDescriptor {
    pub(crate) options: GraphOptions,
    pub(crate) marked: bool,
    pub(crate) color_scheme: ColorScheme,
    pub(crate) nodes: Vec<NodeDescriptor>,
    pub(crate) edges: Vec<EdgeDescriptor>,
    pub(crate) handle: GraphHandle,
}

impl GraphDescriptor {
    /// Node descriptors (transitions, object places, collection points)
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }
    /// Edge descriptors (object arcs, quantity arcs)
    pub fn edges(&self) -> &[EdgeDescriptor] {
        &self.edges
    }
    /// Colors assigned to the object types
    pub fn color_scheme(&self) -> &ColorScheme {
        &self.color_scheme
    }
    /// Options used for building
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }
    /// Whether place markings are shown
    pub fn marked(&self) -> bool {
        self.marked
    }
    /// Get the node with the given identifier
    pub fn get_node(&self, id: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.id() == id)
    }
    /// Get the edge with the given identifier
    pub fn get_edge(&self, id: &str) -> Option<&EdgeDescriptor> {
        self.edges.iter().find(|e| e.id() == id)
    }
    /// Identifiers of all nodes
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id()).collect()
    }
    /// Edges whose source or target is not a node of this graph
    pub fn dangling_edges(&self) -> Vec<&EdgeDescriptor> {
        let node_ids = self.node_ids();
        self.edges
            .iter()
            .filter(|e| !node_ids.contains(e.source()) || !node_ids.contains(e.target()))
            .collect()
    }
    /// The Graphviz graph, if built
    pub fn graph(&self) -> Option<&Graph> {
        match &self.handle {
            GraphHandle::Empty => None,
            GraphHandle::Built(g) => Some(g),
        }
    }
    /// Whether the Graphviz graph is built
    pub fn is_built(&self) -> bool {
        matches!(self.handle, GraphHandle::Built(_))
    }
    /// Discard the Graphviz graph
    pub fn clear_graph(&mut self) {
        if self.is_built() {
            tracing::debug!("discarding quantity net graph");
        }
        self.handle = GraphHandle::Empty;
    }
    ///
    /// Replace all descriptors by the ones of the given snapshot
    ///
    /// Uses the same options as before. The Graphviz graph is discarded,
    /// even if building fails (in which case the old descriptors are kept).
    pub fn rebuild(&mut self, net: &QuantityNet, marked: bool) -> Result<(), QuantityGraphError> {
        self.clear_graph();
        *self = GraphBuilder::new(self.options.clone()).build(net, marked)?;
        Ok(())
    }
}
