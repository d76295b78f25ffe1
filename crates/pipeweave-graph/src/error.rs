//! Pipeline graph error types.

use thiserror::Error;

use crate::definition::{NodeId, NodeKind};
use crate::port::{PortDirection, PortId};

/// Result type for graph mutations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors returned by the graph mutation API.
///
/// Every variant is a local, recoverable condition reported to the caller.
/// Mutations never panic on bad input and never retry internally; cascade
/// removals of dangling edges are not errors and are surfaced through the
/// mutation's return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A referenced node does not exist.
    #[error("node {0} does not exist")]
    NotFound(NodeId),

    /// The named port does not exist on the node, or points the wrong way
    /// for the requested role.
    #[error("node {node_id} has no {direction} port {port_id}")]
    InvalidPort {
        /// Node the port was looked up on.
        node_id: NodeId,
        /// The missing or misdirected port.
        port_id: PortId,
        /// Direction the caller asked for.
        direction: PortDirection,
    },

    /// The edge would connect a node to itself.
    #[error("edge would connect node {0} to itself")]
    SelfLoop(NodeId),

    /// A content update attempted to change the node's kind.
    ///
    /// Kind is fixed at creation; content updates may only swap the payload
    /// within the same variant.
    #[error("node {node_id} is a {expected} node, got {actual} content")]
    KindMismatch {
        /// Node whose content was being replaced.
        node_id: NodeId,
        /// The node's kind, fixed at creation.
        expected: NodeKind,
        /// Kind of the rejected replacement content.
        actual: NodeKind,
    },
}
