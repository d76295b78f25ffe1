//! Edge types connecting node ports.

use std::str::FromStr;

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::NodeId;
use crate::port::PortId;

/// Unique identifier for an edge in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Debug, Display, From, Into)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(transparent)]
pub struct EdgeId(Uuid);

impl EdgeId {
    /// Creates a new random edge ID.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an edge ID from an existing UUID.
    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for EdgeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A reference to one port on one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    /// Node the port belongs to.
    pub node_id: NodeId,
    /// Port on that node.
    pub port_id: PortId,
}

impl PortRef {
    /// Creates a new port reference.
    pub fn new(node_id: NodeId, port_id: PortId) -> Self {
        Self { node_id, port_id }
    }
}

/// A directed connection from one node's output port to another node's
/// input port.
///
/// Self-loops are rejected at creation time. An edge whose endpoint node or
/// port disappears is structurally dangling and is removed by the mutation
/// API as a cascade, never kept around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge identifier.
    pub id: EdgeId,
    /// Originating output port.
    pub source: PortRef,
    /// Receiving input port.
    pub target: PortRef,
}

impl Edge {
    /// Creates a new edge with a fresh identifier.
    pub fn new(source: PortRef, target: PortRef) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            target,
        }
    }

    /// Returns whether the edge touches the given node at either end.
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source.node_id == node_id || self.target.node_id == node_id
    }
}
