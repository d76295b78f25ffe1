//! Pipeline graph runtime representation and mutation API.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use super::snapshot::{PipelineSnapshot, SnapshotNode};
use crate::TRACING_TARGET;
use crate::definition::{Edge, EdgeId, Node, NodeDef, NodeId, PortRef};
use crate::error::{GraphError, GraphResult};
use crate::port::{NodePorts, PortDirection, PortId, derive_ports};

/// Node weight: the definition plus its currently derived ports.
#[derive(Debug, Clone, PartialEq)]
struct NodeSlot {
    id: NodeId,
    node: Node,
    ports: NodePorts,
}

/// Record of a node removal, including the edge cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRemoval {
    /// The removed node.
    pub node: Node,
    /// Edges detached because they touched the removed node.
    pub detached_edges: Vec<Edge>,
}

/// A pipeline graph of typed nodes connected port to port.
///
/// The graph owns every node and edge; external layers hold only opaque
/// identifiers. All writes go through the mutation API, which keeps derived
/// ports consistent with node content and surfaces every cascade removal in
/// the mutation's return value. Each operation is atomic and synchronous;
/// `&mut self` receivers make the single mutual-exclusion boundary the
/// host's ownership of the graph value.
///
/// Internally backed by petgraph's `StableDiGraph`, so indices stay valid
/// across removals.
#[derive(Debug, Clone, Default)]
pub struct PipelineGraph {
    /// The underlying directed graph.
    graph: StableDiGraph<NodeSlot, Edge>,
    /// Mapping from NodeId to petgraph's NodeIndex.
    node_indices: HashMap<NodeId, NodeIndex>,
    /// Mapping from EdgeId to petgraph's EdgeIndex.
    edge_indices: HashMap<EdgeId, EdgeIndex>,
}

impl PipelineGraph {
    /// Creates a new empty pipeline graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns whether a node exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_indices.contains_key(&id)
    }

    /// Returns a reference to a node.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        let index = self.node_indices.get(&id)?;
        self.graph.node_weight(*index).map(|slot| &slot.node)
    }

    /// Returns a node's currently derived ports.
    pub fn ports(&self, id: NodeId) -> Option<&NodePorts> {
        let index = self.node_indices.get(&id)?;
        self.graph.node_weight(*index).map(|slot| &slot.ports)
    }

    /// Returns a reference to an edge.
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        let index = self.edge_indices.get(&id)?;
        self.graph.edge_weight(*index)
    }

    /// Returns an iterator over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.graph.node_weights().map(|slot| (slot.id, &slot.node))
    }

    /// Returns an iterator over all edges.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Returns edges targeting a node.
    pub fn incoming_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.node_indices
            .get(&id)
            .into_iter()
            .flat_map(|index| self.graph.edges_directed(*index, Direction::Incoming))
            .map(|edge_ref| edge_ref.weight())
    }

    /// Returns edges originating from a node.
    pub fn outgoing_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.node_indices
            .get(&id)
            .into_iter()
            .flat_map(|index| self.graph.edges_directed(*index, Direction::Outgoing))
            .map(|edge_ref| edge_ref.weight())
    }

    /// Adds a node to the graph, deriving its initial ports, and returns the
    /// freshly allocated identifier. Never fails.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::new();
        self.insert_node(id, node);
        id
    }

    /// Adds a node with a caller-supplied identifier.
    ///
    /// Used when rehydrating a stored pipeline. The id must not already be
    /// present; identifiers are never reused.
    pub fn add_node_with_id(&mut self, id: NodeId, node: Node) {
        debug_assert!(!self.contains_node(id), "node id {id} already present");
        self.insert_node(id, node);
    }

    fn insert_node(&mut self, id: NodeId, node: Node) {
        let kind = node.inner.kind();
        let ports = derive_ports(&node.inner);
        let index = self.graph.add_node(NodeSlot { id, node, ports });
        self.node_indices.insert(id, index);

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %id,
            kind = %kind,
            "node added"
        );
    }

    /// Removes a node, cascading removal of every edge that touches it.
    ///
    /// Returns the removed node together with the detached edges so the
    /// caller can reflect the lost connections. Returns `None` (a no-op,
    /// not an error) when the node does not exist; callers may race with
    /// concurrent removal.
    pub fn remove_node(&mut self, id: NodeId) -> Option<NodeRemoval> {
        let index = self.node_indices.remove(&id)?;

        let detached_edges: Vec<Edge> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .chain(self.graph.edges_directed(index, Direction::Outgoing))
            .map(|edge_ref| edge_ref.weight().clone())
            .collect();
        for edge in &detached_edges {
            self.edge_indices.remove(&edge.id);
        }

        // StableDiGraph drops the incident edges along with the node.
        let slot = self.graph.remove_node(index)?;

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %id,
            detached = detached_edges.len(),
            "node removed"
        );

        Some(NodeRemoval {
            node: slot.node,
            detached_edges,
        })
    }

    /// Replaces a node's content, re-derives its ports, and reconciles edges.
    ///
    /// Any edge whose endpoint port is no longer present in the freshly
    /// derived port set is removed as a cascade and returned, so the caller
    /// can surface the dropped connections instead of losing them silently.
    ///
    /// Fails with [`GraphError::NotFound`] when the node does not exist and
    /// with [`GraphError::KindMismatch`] when the replacement content would
    /// change the node's kind.
    pub fn update_node_content(&mut self, id: NodeId, def: NodeDef) -> GraphResult<Vec<Edge>> {
        let index = *self.node_indices.get(&id).ok_or(GraphError::NotFound(id))?;
        let Some(slot) = self.graph.node_weight(index) else {
            return Err(GraphError::NotFound(id));
        };

        let expected = slot.node.inner.kind();
        let actual = def.kind();
        if expected != actual {
            return Err(GraphError::KindMismatch {
                node_id: id,
                expected,
                actual,
            });
        }

        let ports = derive_ports(&def);

        let stale: Vec<(EdgeIndex, Edge)> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .filter(|edge_ref| {
                !ports.contains(&edge_ref.weight().target.port_id, PortDirection::Input)
            })
            .chain(
                self.graph
                    .edges_directed(index, Direction::Outgoing)
                    .filter(|edge_ref| {
                        !ports.contains(&edge_ref.weight().source.port_id, PortDirection::Output)
                    }),
            )
            .map(|edge_ref| (edge_ref.id(), edge_ref.weight().clone()))
            .collect();

        let mut dropped_edges = Vec::with_capacity(stale.len());
        for (edge_index, edge) in stale {
            self.edge_indices.remove(&edge.id);
            self.graph.remove_edge(edge_index);

            tracing::debug!(
                target: TRACING_TARGET,
                edge_id = %edge.id,
                node_id = %id,
                "edge dropped: endpoint port no longer derived"
            );

            dropped_edges.push(edge);
        }

        if let Some(slot) = self.graph.node_weight_mut(index) {
            slot.node.inner = def;
            slot.ports = ports;
        }

        tracing::debug!(
            target: TRACING_TARGET,
            node_id = %id,
            dropped = dropped_edges.len(),
            "node content updated"
        );

        Ok(dropped_edges)
    }

    /// Adds an edge from an output port to an input port of another node.
    ///
    /// Fails with [`GraphError::NotFound`] when either node is missing, with
    /// [`GraphError::InvalidPort`] when a named port does not exist or has
    /// the wrong direction for its role, and with [`GraphError::SelfLoop`]
    /// when both endpoints name the same node. Succeeds even when the edge
    /// introduces a cycle; acyclicity is checked by [`super::validate`], not
    /// at creation time, so intermediate invalid states stay editable.
    pub fn add_edge(&mut self, source: PortRef, target: PortRef) -> GraphResult<EdgeId> {
        let source_index = *self
            .node_indices
            .get(&source.node_id)
            .ok_or(GraphError::NotFound(source.node_id))?;
        let target_index = *self
            .node_indices
            .get(&target.node_id)
            .ok_or(GraphError::NotFound(target.node_id))?;

        self.check_port(source_index, &source, PortDirection::Output)?;
        self.check_port(target_index, &target, PortDirection::Input)?;

        if source.node_id == target.node_id {
            return Err(GraphError::SelfLoop(source.node_id));
        }

        let edge = Edge::new(source, target);
        let id = edge.id;
        let index = self.graph.add_edge(source_index, target_index, edge);
        self.edge_indices.insert(id, index);

        tracing::debug!(
            target: TRACING_TARGET,
            edge_id = %id,
            "edge added"
        );

        Ok(id)
    }

    /// Connects two nodes through their default output and input ports.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> GraphResult<EdgeId> {
        self.add_edge(
            PortRef::new(from, PortId::output()),
            PortRef::new(to, PortId::input()),
        )
    }

    fn check_port(
        &self,
        index: NodeIndex,
        port_ref: &PortRef,
        direction: PortDirection,
    ) -> GraphResult<()> {
        let Some(slot) = self.graph.node_weight(index) else {
            return Err(GraphError::NotFound(port_ref.node_id));
        };
        if slot.ports.contains(&port_ref.port_id, direction) {
            Ok(())
        } else {
            Err(GraphError::InvalidPort {
                node_id: port_ref.node_id,
                port_id: port_ref.port_id.clone(),
                direction,
            })
        }
    }

    /// Removes an edge, returning it. No-op (`None`) when absent.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let index = self.edge_indices.remove(&id)?;
        let edge = self.graph.remove_edge(index)?;

        tracing::debug!(
            target: TRACING_TARGET,
            edge_id = %id,
            "edge removed"
        );

        Some(edge)
    }

    /// Returns an immutable, consistent view of all current nodes and edges.
    ///
    /// The snapshot is owned data reflecting the graph at a single point in
    /// time; later mutations never show through it.
    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            nodes: self
                .graph
                .node_weights()
                .map(|slot| SnapshotNode {
                    id: slot.id,
                    kind: slot.node.inner.kind(),
                    node: Some(slot.node.clone()),
                    ports: Some(slot.ports.clone()),
                })
                .collect(),
            edges: self.graph.edge_weights().cloned().collect(),
        }
    }
}
