//! Application state for the HTTP server.
//!
//! Every collaborator is injected here at construction: the event
//! repository, the identity provider and the clock. Handlers never reach
//! for globals.

use event_manager_auth::IdentityProvider;
use event_manager_core::environment::{Clock, SystemClock};
use event_manager_core::management::EventManagementService;
use event_manager_core::query::EventQueryService;
use event_manager_core::registration::RegistrationService;
use event_manager_core::EventRepository;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply, via `Arc`) for each request.
///
/// # Type Parameters
///
/// - `E`: event storage (`PostgresEventRepository` in production)
/// - `I`: identity provider (`IdentityService` in production)
/// - `C`: clock deciding whether an event is in the past
pub struct AppState<E, I, C = SystemClock> {
    events: Arc<E>,
    identity: Arc<I>,
    registrations: RegistrationService<E, C>,
    queries: EventQueryService<E>,
    management: EventManagementService<E, C>,
    metrics: Option<PrometheusHandle>,
}

impl<E, I, C> Clone for AppState<E, I, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            identity: Arc::clone(&self.identity),
            registrations: self.registrations.clone(),
            queries: self.queries.clone(),
            management: self.management.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<E, I, C> AppState<E, I, C>
where
    E: EventRepository,
    I: IdentityProvider,
    C: Clock,
{
    /// Wire the domain services over the injected collaborators.
    #[must_use]
    pub fn new(events: Arc<E>, identity: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            registrations: RegistrationService::new(Arc::clone(&events), Arc::clone(&clock)),
            queries: EventQueryService::new(Arc::clone(&events)),
            management: EventManagementService::new(Arc::clone(&events), clock),
            events,
            identity,
            metrics: None,
        }
    }

    /// Serve Prometheus output from `handle` at `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Event storage, for readiness probes.
    #[must_use]
    pub const fn events(&self) -> &Arc<E> {
        &self.events
    }

    /// Identity provider.
    #[must_use]
    pub const fn identity(&self) -> &Arc<I> {
        &self.identity
    }

    /// Register and unregister.
    #[must_use]
    pub const fn registrations(&self) -> &RegistrationService<E, C> {
        &self.registrations
    }

    /// Owner-scoped and public listings.
    #[must_use]
    pub const fn queries(&self) -> &EventQueryService<E> {
        &self.queries
    }

    /// Create, edit and delete owned events.
    #[must_use]
    pub const fn management(&self) -> &EventManagementService<E, C> {
        &self.management
    }

    /// Prometheus handle, when metrics are enabled.
    #[must_use]
    pub const fn metrics(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }
}
