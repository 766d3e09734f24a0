//! Error types for web handlers.
//!
//! This module bridges domain errors ([`EventError`], [`AuthError`]) and HTTP
//! responses, implementing Axum's `IntoResponse` trait. Every error renders
//! as the same JSON envelope:
//!
//! ```json
//! { "code": "NOT_FOUND", "message": "Event with id ... not found" }
//! ```
//!
//! # Ownership failures
//!
//! [`EventError::Forbidden`] is rendered exactly like [`EventError::NotFound`].
//! A caller probing someone else's event id learns nothing about whether it
//! exists.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use event_manager_auth::AuthError;
use event_manager_core::EventError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Event>, AppError> {
///     let event = events.get_own_detail(user, id).await?;
///     Ok(Json(event))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a 400 Bad Request error with a specific code.
    #[must_use]
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), code.to_string())
    }

    /// Create a 400 error for malformed or missing input.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::bad_request("VALIDATION_ERROR", message)
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(message) => Self::validation(message),
            EventError::NotFound(id) | EventError::Forbidden(id) => Self::not_found("Event", id),
            past @ EventError::PastEvent { .. } => Self::bad_request("PAST_EVENT", past.to_string()),
            EventError::CapacityExceeded { .. } => {
                Self::bad_request("CAPACITY_EXCEEDED", "Event is full")
            }
            EventError::Storage(message) => Self::internal("An internal error occurred")
                .with_source(anyhow::anyhow!(message)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => Self::validation(message),
            AuthError::UsernameTaken(_) => Self::bad_request("USERNAME_TAKEN", err.to_string()),
            AuthError::InvalidCredentials => {
                Self::bad_request("INVALID_CREDENTIALS", err.to_string())
            }
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound => {
                Self::unauthorized(err.to_string())
            }
            AuthError::DatabaseError(_) | AuthError::InternalError => {
                Self::internal("An internal error occurred").with_source(anyhow::Error::new(err))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use event_manager_core::{EventId, MembershipAction};

    #[test]
    fn test_error_display() {
        let err = AppError::validation("Invalid input");
        assert_eq!(err.to_string(), "[VALIDATION_ERROR] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Event", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Event with id 123 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_forbidden_is_indistinguishable_from_not_found() {
        let id = EventId::new();
        let missing = AppError::from(EventError::NotFound(id));
        let foreign = AppError::from(EventError::Forbidden(id));

        assert_eq!(missing.status(), foreign.status());
        assert_eq!(missing.code(), foreign.code());
        assert_eq!(missing.message(), foreign.message());
    }

    #[test]
    fn test_event_rule_violations_are_bad_requests() {
        let id = EventId::new();
        let past = AppError::from(EventError::PastEvent {
            event_id: id,
            action: MembershipAction::Unregister,
        });
        assert_eq!(past.status(), StatusCode::BAD_REQUEST);
        assert_eq!(past.code(), "PAST_EVENT");
        assert_eq!(past.message(), "Cannot unregister from past events");

        let full = AppError::from(EventError::CapacityExceeded {
            event_id: id,
            capacity: 1,
        });
        assert_eq!(full.status(), StatusCode::BAD_REQUEST);
        assert_eq!(full.message(), "Event is full");
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let err = AppError::from(EventError::Storage("connection refused".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            AppError::from(AuthError::UsernameTaken("u1".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).code(),
            "INVALID_CREDENTIALS"
        );
        assert_eq!(
            AppError::from(AuthError::TokenExpired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::DatabaseError("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
