//! Liveness endpoint.
//!
//! Load balancers and orchestrators poll this to see whether the process is
//! up. It deliberately checks no dependencies; readiness lives with the
//! application that knows what its dependencies are.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Liveness response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process can answer.
    pub status: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
}

/// Simple health check endpoint.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "version": "0.1.0" }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
