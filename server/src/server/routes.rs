//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::readiness_check;
use super::state::AppState;
use crate::api::{accounts, events, registrations};
use crate::metrics::metrics_endpoint;
use axum::{
    Router,
    routing::{get, post},
};
use event_manager_auth::IdentityProvider;
use event_manager_core::EventRepository;
use event_manager_core::environment::Clock;
use event_manager_web::correlation_id_layer;
use event_manager_web::handlers::health_check;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Routes:
/// - Health, readiness and metrics (no authentication)
/// - Account registration, login and token endpoints (no authentication)
/// - Event management under `/api/events` (bearer token, creator only)
/// - Public listing under `/api/public/events`
/// - Registration under `/api/registrations` (bearer token)
///
/// Every request gets a correlation id and a trace span.
pub fn build_router<E, I, C>(state: AppState<E, I, C>) -> Router
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let api_routes = Router::new()
        // Tokens
        .route("/token", post(accounts::login::<E, I, C>))
        .route("/token/refresh", post(accounts::refresh::<E, I, C>))
        .route("/token/verify", post(accounts::verify::<E, I, C>))
        // Event management
        .route(
            "/events",
            get(events::list_own_events::<E, I, C>).post(events::create_event::<E, I, C>),
        )
        .route(
            "/events/:id",
            get(events::get_event::<E, I, C>)
                .put(events::update_event::<E, I, C>)
                .patch(events::patch_event::<E, I, C>)
                .delete(events::delete_event::<E, I, C>),
        )
        .route("/public/events", get(events::list_all_events::<E, I, C>))
        // Registrations
        .route(
            "/registrations",
            post(registrations::register::<E, I, C>).delete(registrations::unregister::<E, I, C>),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<E, I, C>))
        .route("/metrics", get(metrics_endpoint::<E, I, C>))
        .route("/register", post(accounts::register::<E, I, C>))
        .route("/login", post(accounts::login::<E, I, C>))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
