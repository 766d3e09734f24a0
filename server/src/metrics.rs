//! Prometheus metrics for the event manager.
//!
//! The domain services record counters through the `metrics` facade. This
//! module installs the Prometheus recorder behind that facade and renders
//! the scrape output for `GET /metrics`.
//!
//! # Exported Metrics
//!
//! - `event_manager_registrations_total{outcome}`
//! - `event_manager_unregistrations_total{outcome}`
//! - `event_manager_events_created_total`
//! - `event_manager_store_errors_total{context}`

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use event_manager_auth::IdentityProvider;
use event_manager_core::{EventRepository, environment::Clock};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

use crate::server::AppState;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the Prometheus recorder and describe every counter.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a global recorder is already set.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "event_manager_registrations_total",
        "Registration attempts by outcome (ok, invalid, not_found, past_event, full, error)"
    );
    describe_counter!(
        "event_manager_unregistrations_total",
        "Unregistration attempts by outcome (ok, invalid, not_found, past_event, error)"
    );
    describe_counter!(
        "event_manager_events_created_total",
        "Total number of events created"
    );
    describe_counter!(
        "event_manager_store_errors_total",
        "Storage failures by operation"
    );
}

/// Prometheus scrape endpoint.
///
/// Responds 404 when the exporter is disabled.
#[allow(clippy::unused_async)]
pub async fn metrics_endpoint<E, I, C>(State(state): State<AppState<E, I, C>>) -> Response
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    match state.metrics() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
