//! Event management API endpoints.
//!
//! - GET /api/events - List the caller's events (requires auth)
//! - POST /api/events - Create an event (requires auth)
//! - GET /api/events/:id - Event detail (requires ownership)
//! - PUT /api/events/:id - Replace editable fields (requires ownership)
//! - PATCH /api/events/:id - Partial edit (requires ownership)
//! - DELETE /api/events/:id - Delete (requires ownership)
//! - GET /api/public/events - Every event, no auth
//!
//! Ownership failures come back as 404, indistinguishable from a missing
//! event.

use crate::auth::AuthUser;
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use event_manager_auth::IdentityProvider;
use event_manager_core::environment::Clock;
use event_manager_core::{Event, EventDraft, EventId, EventPatch, EventRepository};
use event_manager_web::{AppError, JsonBody};

/// An id that cannot name an event is reported the same way as a missing one.
fn parse_event_id(raw: &str) -> Result<EventId, AppError> {
    raw.parse()
        .map_err(|_: event_manager_core::ParseIdError| AppError::not_found("Event", raw))
}

/// List events created by the caller, oldest first.
pub async fn list_own_events<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
) -> Result<Json<Vec<Event>>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    Ok(Json(state.queries().list_own(user.user_id).await?))
}

/// Create an event owned by the caller.
///
/// The creator is not added to the attendee list.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events \
///   -H "Authorization: Bearer <access_token>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "title": "Rust Meetup",
///     "description": "Monthly meetup",
///     "type": "meetup",
///     "status": "scheduled",
///     "date": "2030-06-01T18:00:00Z",
///     "capacity": 40
///   }'
/// ```
pub async fn create_event<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    JsonBody(draft): JsonBody<EventDraft>,
) -> Result<(StatusCode, Json<Event>), AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event = state.management().create(user.user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Event detail, for its creator only.
pub async fn get_event<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event_id = parse_event_id(&id)?;
    Ok(Json(
        state.queries().get_own_detail(user.user_id, event_id).await?,
    ))
}

/// Replace every editable field of an owned event.
pub async fn update_event<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    Path(id): Path<String>,
    JsonBody(draft): JsonBody<EventDraft>,
) -> Result<Json<Event>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event_id = parse_event_id(&id)?;
    Ok(Json(
        state
            .management()
            .update_own(user.user_id, event_id, draft)
            .await?,
    ))
}

/// Change some editable fields of an owned event.
pub async fn patch_event<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<EventPatch>,
) -> Result<Json<Event>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event_id = parse_event_id(&id)?;
    Ok(Json(
        state
            .management()
            .patch_own(user.user_id, event_id, patch)
            .await?,
    ))
}

/// Delete an owned event and its attendee list.
pub async fn delete_event<E, I, C>(
    user: AuthUser,
    State(state): State<AppState<E, I, C>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let event_id = parse_event_id(&id)?;
    state.management().delete_own(user.user_id, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every event, oldest first. No authentication required.
pub async fn list_all_events<E, I, C>(
    State(state): State<AppState<E, I, C>>,
) -> Result<Json<Vec<Event>>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    Ok(Json(state.queries().list_all().await?))
}
