//! Identity provider trait.

use super::{TokenPair, User};
use crate::error::Result;
use event_manager_core::id::UserId;
use std::future::Future;

/// Everything the API boundary needs from the identity store.
///
/// Implemented by [`IdentityService`](crate::service::IdentityService).
pub trait IdentityProvider: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `Validation`: blank username or password, or a malformed username
    /// - `UsernameTaken`: the username is in use
    /// - `DatabaseError` / `InternalError`: storage or hashing failed
    fn register_user(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<User>> + Send;

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials`: unknown user or wrong password
    /// - `DatabaseError` / `InternalError`: storage or hashing failed
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<User>> + Send;

    /// Issue a fresh access/refresh pair for `user`.
    ///
    /// # Errors
    ///
    /// - `InternalError`: signing failed
    fn issue_token_pair(&self, user: &User) -> Result<TokenPair>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// - `InvalidToken`: malformed, wrong kind, or the user no longer exists
    /// - `TokenExpired`: the refresh token has expired
    fn refresh(&self, refresh_token: &str) -> impl Future<Output = Result<String>> + Send;

    /// Check that a token of either kind is well-formed, signed and unexpired.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` / `TokenExpired`
    fn verify(&self, token: &str) -> Result<()>;

    /// Resolve an access token to the user it was issued for.
    ///
    /// # Errors
    ///
    /// - `InvalidToken`: malformed, refresh-typed, or the user no longer exists
    /// - `TokenExpired`: the access token has expired
    fn resolve(&self, access_token: &str) -> impl Future<Output = Result<UserId>> + Send;
}
