//! Structural DAG validation.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::snapshot::PipelineSnapshot;
use crate::definition::NodeId;

/// Summary produced by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Total number of nodes, isolated nodes included.
    pub num_nodes: usize,
    /// Total number of edges, parallel edges counted separately.
    pub num_edges: usize,
    /// Whether the graph contains no directed cycle.
    pub is_dag: bool,
}

/// Validates a pipeline snapshot with Kahn's algorithm.
///
/// Builds each node's out-neighbor list and in-degree from the edges
/// (parallel edges count separately), seeds a worklist with every
/// zero-in-degree node in snapshot order, then repeatedly retires the front
/// node and decrements its out-neighbors, appending any that reach zero.
/// The graph is a DAG exactly when every node gets retired.
///
/// Never fails and never mutates its input; an identical snapshot always
/// produces an identical report, so a remote validator and a local fallback
/// running this function agree by construction. Edges whose endpoints are
/// not in the snapshot's node set still count toward `num_edges` but
/// contribute nothing to adjacency.
pub fn validate(snapshot: &PipelineSnapshot) -> ValidationReport {
    let num_nodes = snapshot.node_count();
    let num_edges = snapshot.edge_count();

    let mut out_neighbors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut in_degree: HashMap<NodeId, usize> = HashMap::new();
    for node in &snapshot.nodes {
        out_neighbors.entry(node.id).or_default();
        in_degree.entry(node.id).or_insert(0);
    }

    for edge in &snapshot.edges {
        let from = edge.source.node_id;
        let to = edge.target.node_id;
        if !in_degree.contains_key(&to) {
            continue;
        }
        let Some(neighbors) = out_neighbors.get_mut(&from) else {
            continue;
        };
        neighbors.push(to);
        if let Some(degree) = in_degree.get_mut(&to) {
            *degree += 1;
        }
    }

    let mut worklist: VecDeque<NodeId> = snapshot
        .nodes
        .iter()
        .map(|node| node.id)
        .filter(|id| in_degree.get(id).copied() == Some(0))
        .collect();

    let mut processed = 0usize;
    while let Some(current) = worklist.pop_front() {
        processed += 1;
        let Some(neighbors) = out_neighbors.get(&current) else {
            continue;
        };
        for next in neighbors {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    worklist.push_back(*next);
                }
            }
        }
    }

    ValidationReport {
        num_nodes,
        num_edges,
        is_dag: processed == num_nodes,
    }
}
