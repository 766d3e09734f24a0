//! Authentication extractor.
//!
//! Handlers that need a caller identity take an [`AuthUser`] argument. The
//! extractor reads the bearer token and resolves it through the identity
//! provider held in [`AppState`].
//!
//! ```ignore
//! async fn list_own(user: AuthUser, State(state): State<AppState<E, I, C>>) -> ... {
//!     state.queries().list_own(user.user_id).await
//! }
//! ```

use crate::server::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use event_manager_auth::IdentityProvider;
use event_manager_core::environment::Clock;
use event_manager_core::{EventRepository, UserId};
use event_manager_web::{AppError, BearerToken};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// Id resolved from the access token.
    pub user_id: UserId,
}

#[async_trait]
impl<E, I, C> FromRequestParts<AppState<E, I, C>> for AuthUser
where
    E: EventRepository + 'static,
    I: IdentityProvider + 'static,
    C: Clock + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<E, I, C>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let user_id = state.identity().resolve(&token).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::from(e)
        })?;

        Ok(Self { user_id })
    }
}
