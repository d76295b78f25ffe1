//! Pipeline validation handlers.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pipeweave_graph::graph::{PipelineSnapshot, ValidationReport, validate};

/// Tracing target for pipeline validation operations.
const TRACING_TARGET: &str = "pipeweave_server::handler::pipelines";

/// Validates a submitted pipeline graph.
///
/// The body is the wire snapshot the canvas ships (`{nodes: [{id, kind}],
/// edges: [...]}`). The computation behind the response is the same
/// [`validate`] function a client falls back to when this service is
/// unreachable, so both paths return identical results for identical graphs.
#[tracing::instrument(skip_all)]
async fn parse_pipeline(
    Json(snapshot): Json<PipelineSnapshot>,
) -> (StatusCode, Json<ValidationReport>) {
    let report = validate(&snapshot);

    tracing::debug!(
        target: TRACING_TARGET,
        num_nodes = report.num_nodes,
        num_edges = report.num_edges,
        is_dag = report.is_dag,
        "pipeline validated"
    );

    (StatusCode::OK, Json(report))
}

/// Returns a [`Router`] with pipeline routes.
pub fn routes() -> Router {
    Router::new().route("/pipelines/parse", post(parse_pipeline))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use pipeweave_graph::prelude::*;
    use serde_json::json;

    use crate::handler::routes;

    fn server() -> TestServer {
        TestServer::new(routes()).expect("router is valid")
    }

    #[tokio::test]
    async fn test_parse_linear_pipeline() {
        let server = server();

        let response = server
            .post("/pipelines/parse")
            .json(&json!({
                "nodes": [
                    { "id": "0192c7a4-0000-7000-8000-000000000001", "kind": "input" },
                    { "id": "0192c7a4-0000-7000-8000-000000000002", "kind": "model_call" },
                    { "id": "0192c7a4-0000-7000-8000-000000000003", "kind": "output" },
                ],
                "edges": [
                    {
                        "id": "0192c7a4-0000-7000-8000-00000000000a",
                        "source": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000001",
                            "portId": "out",
                        },
                        "target": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000002",
                            "portId": "in",
                        },
                    },
                    {
                        "id": "0192c7a4-0000-7000-8000-00000000000b",
                        "source": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000002",
                            "portId": "out",
                        },
                        "target": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000003",
                            "portId": "in",
                        },
                    },
                ],
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "numNodes": 3, "numEdges": 2, "isDag": true }));
    }

    #[tokio::test]
    async fn test_parse_cyclic_pipeline() {
        let server = server();

        let response = server
            .post("/pipelines/parse")
            .json(&json!({
                "nodes": [
                    { "id": "0192c7a4-0000-7000-8000-000000000001", "kind": "model_call" },
                    { "id": "0192c7a4-0000-7000-8000-000000000002", "kind": "model_call" },
                    { "id": "0192c7a4-0000-7000-8000-000000000003", "kind": "model_call" },
                ],
                "edges": [
                    {
                        "id": "0192c7a4-0000-7000-8000-00000000000a",
                        "source": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000001",
                            "portId": "out",
                        },
                        "target": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000002",
                            "portId": "in",
                        },
                    },
                    {
                        "id": "0192c7a4-0000-7000-8000-00000000000b",
                        "source": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000002",
                            "portId": "out",
                        },
                        "target": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000003",
                            "portId": "in",
                        },
                    },
                    {
                        "id": "0192c7a4-0000-7000-8000-00000000000c",
                        "source": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000003",
                            "portId": "out",
                        },
                        "target": {
                            "nodeId": "0192c7a4-0000-7000-8000-000000000001",
                            "portId": "in",
                        },
                    },
                ],
            }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "numNodes": 3, "numEdges": 3, "isDag": false }));
    }

    #[tokio::test]
    async fn test_parse_empty_pipeline() {
        let server = server();

        let response = server
            .post("/pipelines/parse")
            .json(&json!({ "nodes": [], "edges": [] }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "numNodes": 0, "numEdges": 0, "isDag": true }));
    }

    #[tokio::test]
    async fn test_parse_rejects_unknown_kind() {
        let server = server();

        let response = server
            .post("/pipelines/parse")
            .json(&json!({
                "nodes": [
                    { "id": "0192c7a4-0000-7000-8000-000000000001", "kind": "sparkle" },
                ],
                "edges": [],
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_parse_rejects_malformed_body() {
        let server = server();

        let response = server
            .post("/pipelines/parse")
            .json(&json!({ "edges": [] }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_remote_result_matches_local_fallback() {
        // A canvas that cannot reach this service runs `validate` locally;
        // a full snapshot posted over the wire must produce the same report.
        let mut graph = PipelineGraph::new();
        let input = graph.add_node(Node::new(NodeDef::Input(InputDef::default())));
        let text = graph.add_node(Node::new(NodeDef::Text(TextDef::new("{{question}}"))));
        graph
            .add_edge(
                PortRef::new(input, PortId::output()),
                PortRef::new(text, PortId::variable("question")),
            )
            .expect("edge added");

        let snapshot = graph.snapshot();
        let local = validate(&snapshot);

        let server = server();
        let response = server.post("/pipelines/parse").json(&snapshot).await;

        response.assert_status_ok();
        response.assert_json(&serde_json::to_value(local).expect("report serializes"));
    }
}
