//! Registration API endpoints.
//!
//! - POST /api/registrations - Join an event, `{"event_id": "..."}` in the body
//! - DELETE /api/registrations?event_id=... - Leave an event
//!
//! The event id travels in the body for POST and in the query string for
//! DELETE. Existing clients depend on that shape.

use crate::auth::AuthUser;
use crate::server::AppState;
use axum::{Json, extract::State};
use event_manager_auth::IdentityProvider;
use event_manager_core::environment::Clock;
use event_manager_core::{EventId, EventRepository, Membership, MembershipChange};
use event_manager_web::{AppError, JsonBody, QueryParams};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Event targeted by a registration call.
///
/// Used as the POST body and as the DELETE query string.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationTarget {
    /// Event id. Missing or blank is a validation error.
    #[serde(default)]
    pub event_id: Option<String>,
}

impl RegistrationTarget {
    fn event_id(&self) -> Result<EventId, AppError> {
        match self.event_id.as_deref().map(str::trim) {
            None | Some("") => Err(AppError::validation("Event ID is required")),
            Some(raw) => raw
                .parse()
                .map_err(|e: event_manager_core::ParseIdError| AppError::validation(e.to_string())),
        }
    }
}

/// Result of a registration call.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    /// Human-readable summary
    pub message: &'static str,
    /// Membership details
    #[serde(flatten)]
    pub membership: Membership,
}

const fn register_message(change: MembershipChange) -> &'static str {
    if matches!(change, MembershipChange::Unchanged) {
        "Already registered for the event"
    } else {
        "Successfully registered for the event"
    }
}

const fn unregister_message(change: MembershipChange) -> &'static str {
    if matches!(change, MembershipChange::Unchanged) {
        "Not registered for the event"
    } else {
        "Successfully unregistered from the event"
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Register the caller for an event.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/registrations \
///   -H "Authorization: Bearer <access_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"event_id": "550e8400-e29b-41d4-a716-446655440000"}'
/// ```
pub async fn register<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    JsonBody(target): JsonBody<RegistrationTarget>,
) -> Result<Json<RegistrationResponse>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event_id = target.event_id()?;
    let membership = state
        .registrations()
        .register(event_id, user.user_id)
        .await?;

    Ok(Json(RegistrationResponse {
        message: register_message(membership.change),
        membership,
    }))
}

/// Unregister the caller from an event.
///
/// # Example
///
/// ```bash
/// curl -X DELETE "http://localhost:8080/api/registrations?event_id=550e8400-e29b-41d4-a716-446655440000" \
///   -H "Authorization: Bearer <access_token>"
/// ```
pub async fn unregister<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    QueryParams(target): QueryParams<RegistrationTarget>,
) -> Result<Json<RegistrationResponse>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event_id = target.event_id()?;
    let membership = state
        .registrations()
        .unregister(event_id, user.user_id)
        .await?;

    Ok(Json(RegistrationResponse {
        message: unregister_message(membership.change),
        membership,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn missing_event_id_is_a_validation_error() {
        let err = RegistrationTarget::default().event_id().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Event ID is required");

        let blank = RegistrationTarget {
            event_id: Some("  ".to_string()),
        };
        assert!(blank.event_id().is_err());
    }

    #[test]
    fn malformed_event_id_is_a_validation_error() {
        let target = RegistrationTarget {
            event_id: Some("42".to_string()),
        };
        assert_eq!(target.event_id().unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
