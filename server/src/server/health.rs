//! Readiness endpoint.
//!
//! Liveness (`GET /health`) comes from `event-manager-web`. Readiness also
//! checks that the event store answers.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use event_manager_auth::IdentityProvider;
use event_manager_core::EventRepository;
use event_manager_core::environment::Clock;
use serde::Serialize;

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Event store connectivity
    pub database: bool,
}

/// Readiness check endpoint.
///
/// Returns 200 when the event store is reachable, 503 otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/ready
/// # {"ready":true,"database":true}
/// ```
pub async fn readiness_check<E, I, C>(
    State(state): State<AppState<E, I, C>>,
) -> (StatusCode, Json<ReadinessResponse>)
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let database = match state.events().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            false
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            ready: database,
            database,
        }),
    )
}
