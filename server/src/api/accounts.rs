//! Account and token endpoints.
//!
//! - POST /register - Create an account
//! - POST /login (alias POST /api/token) - Exchange credentials for tokens
//! - POST /api/token/refresh - Exchange a refresh token for an access token
//! - POST /api/token/verify - Check a token of either kind

use crate::server::AppState;
use axum::{Json, extract::State, http::StatusCode};
use event_manager_auth::{IdentityProvider, TokenPair};
use event_manager_core::EventRepository;
use event_manager_core::environment::Clock;
use event_manager_web::{AppError, JsonBody};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Username and password, for both registration and login.
///
/// Missing fields deserialize as empty strings and are rejected by the
/// identity provider with a validation error.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Plaintext password
    #[serde(default)]
    pub password: String,
}

/// Confirmation returned after registration.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Request to refresh an access token.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token issued at login
    pub refresh: String,
}

/// A newly issued access token.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    /// Access token
    pub access: String,
}

/// Request to verify a token.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    /// Token of either kind
    pub token: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create an account.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/register \
///   -H "Content-Type: application/json" \
///   -d '{"username": "u1", "password": "p1"}'
/// # {"message":"User created successfully"}
/// ```
pub async fn register<E, I, C>(
    State(state): State<AppState<E, I, C>>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    state
        .identity()
        .register_user(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// Exchange credentials for an access/refresh token pair.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/login \
///   -H "Content-Type: application/json" \
///   -d '{"username": "u1", "password": "p1"}'
/// # {"access":"...","refresh":"..."}
/// ```
pub async fn login<E, I, C>(
    State(state): State<AppState<E, I, C>>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Json<TokenPair>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::validation("Username and password required"));
    }

    let identity = state.identity();
    let user = identity
        .authenticate(&request.username, &request.password)
        .await?;
    let tokens = identity.issue_token_pair(&user)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token.
pub async fn refresh<E, I, C>(
    State(state): State<AppState<E, I, C>>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> Result<Json<AccessResponse>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    let access = state.identity().refresh(&request.refresh).await?;
    Ok(Json(AccessResponse { access }))
}

/// Check that a token is well-formed, signed and unexpired.
///
/// Responds with an empty object on success.
#[allow(clippy::unused_async)]
pub async fn verify<E, I, C>(
    State(state): State<AppState<E, I, C>>,
    JsonBody(request): JsonBody<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AppError>
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    state.identity().verify(&request.token)?;
    Ok(Json(serde_json::json!({})))
}
