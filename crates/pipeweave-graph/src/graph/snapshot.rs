//! Immutable pipeline views consumed by readers.

use serde::{Deserialize, Serialize};

use crate::definition::{Edge, Node, NodeId, NodeKind};
use crate::port::NodePorts;

/// A node as it appears in a snapshot.
///
/// The identifier and kind are always present. The full definition and the
/// derived ports are filled in when the snapshot comes from a live graph and
/// omitted in the wire form a canvas submits for validation, which carries
/// `{id, kind}` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    /// Node identifier.
    pub id: NodeId,
    /// Node kind.
    pub kind: NodeKind,
    /// Full node definition, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,
    /// Derived ports, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<NodePorts>,
}

/// A consistent point-in-time view of all nodes and edges.
///
/// Snapshots are owned data: later mutations never show through, so readers
/// (the validator, a rendering layer) always observe a state that existed at
/// a single point in time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    /// Nodes in insertion order.
    pub nodes: Vec<SnapshotNode>,
    /// Edges in creation order.
    pub edges: Vec<Edge>,
}

impl PipelineSnapshot {
    /// Returns the number of nodes in the snapshot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the snapshot.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form_deserializes_without_detail() {
        let payload = serde_json::json!({
            "nodes": [
                { "id": "0192c7a4-5a6e-7bbf-9d2e-1f0a8c3b4d5e", "kind": "input" },
                { "id": "0192c7a4-5a6e-7bbf-9d2e-1f0a8c3b4d5f", "kind": "model_call" },
            ],
            "edges": [],
        });

        let snapshot: PipelineSnapshot =
            serde_json::from_value(payload).expect("deserialization failed");
        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(snapshot.nodes[0].kind, NodeKind::Input);
        assert!(snapshot.nodes[0].node.is_none());
        assert!(snapshot.nodes[0].ports.is_none());
    }

    #[test]
    fn test_detail_fields_are_omitted_when_absent() {
        let snapshot = PipelineSnapshot {
            nodes: vec![SnapshotNode {
                id: NodeId::new(),
                kind: NodeKind::Filter,
                node: None,
                ports: None,
            }],
            edges: Vec::new(),
        };

        let json = serde_json::to_value(&snapshot).expect("serialization failed");
        let node = &json["nodes"][0];
        assert_eq!(node["kind"], "filter");
        assert!(node.get("node").is_none());
        assert!(node.get("ports").is_none());
    }
}
