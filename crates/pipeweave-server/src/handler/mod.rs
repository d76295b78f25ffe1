//! All `axum` routers and request handlers.

mod pipelines;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// Tracing target for utility handlers.
const TRACING_TARGET: &str = "pipeweave_server::handler";

/// Returns the service router with all routes attached.
pub fn routes() -> Router {
    Router::new()
        .route("/", get(service_status))
        .merge(pipelines::routes())
}

/// Service liveness message.
#[derive(Debug, Serialize)]
struct ServiceStatus {
    /// Human-readable status line.
    message: &'static str,
}

/// Reports that the service is up.
async fn service_status() -> Json<ServiceStatus> {
    tracing::trace!(
        target: TRACING_TARGET,
        "liveness probe"
    );

    Json(ServiceStatus {
        message: "Pipeweave validation service is running",
    })
}
