//! The identity store: accounts, credentials and bearer tokens.

use crate::config::TokenConfig;
use crate::error::{AuthError, Result};
use crate::password::{hash_password_blocking, verify_password_blocking, verify_unknown_user};
use crate::providers::{IdentityProvider, TokenPair, User, UserRepository};
use crate::tokens::{TokenCodec, TokenKind};
use event_manager_core::environment::Clock;
use event_manager_core::id::UserId;
use std::sync::Arc;

/// Maximum username length, in characters.
pub const MAX_USERNAME_LEN: usize = 150;

const CREDENTIALS_REQUIRED: &str = "Username and password required";

/// Check a username against the account naming rules.
///
/// Usernames are 1 to 150 characters of letters, digits and `@ . + - _`.
///
/// # Errors
///
/// Returns `AuthError::Validation` describing the problem.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(AuthError::Validation(CREDENTIALS_REQUIRED.to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AuthError::Validation(
            "Username may only contain letters, digits and @/./+/-/_".to_string(),
        ));
    }
    Ok(())
}

/// [`IdentityProvider`] backed by a [`UserRepository`].
pub struct IdentityService<R, C> {
    users: Arc<R>,
    clock: Arc<C>,
    tokens: Arc<TokenCodec>,
}

impl<R, C> Clone for IdentityService<R, C> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<R: UserRepository, C: Clock> IdentityService<R, C> {
    /// Create an identity service.
    #[must_use]
    pub fn new(users: Arc<R>, clock: Arc<C>, config: &TokenConfig) -> Self {
        Self {
            users,
            clock,
            tokens: Arc::new(TokenCodec::new(config)),
        }
    }

    /// The underlying user repository.
    #[must_use]
    pub const fn users(&self) -> &Arc<R> {
        &self.users
    }

    async fn existing_user(&self, user_id: UserId) -> Result<UserId> {
        match self.users.get_user_by_id(user_id).await {
            Ok(user) => Ok(user.id),
            Err(AuthError::UserNotFound) => {
                tracing::debug!(%user_id, "Token names a deleted user");
                Err(AuthError::InvalidToken)
            }
            Err(e) => Err(e),
        }
    }
}

impl<R: UserRepository, C: Clock> IdentityProvider for IdentityService<R, C> {
    #[tracing::instrument(skip(self, password))]
    async fn register_user(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if password.is_empty() {
            return Err(AuthError::Validation(CREDENTIALS_REQUIRED.to_string()));
        }
        validate_username(username)?;

        let password_hash = hash_password_blocking(password.to_string()).await?;
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash,
            created_at: self.clock.now(),
        };

        let user = self.users.create_user(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    #[tracing::instrument(skip(self, password))]
    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = match self.users.get_user_by_username(username.trim()).await {
            Ok(user) => user,
            Err(AuthError::UserNotFound) => {
                tracing::debug!("Login for unknown username");
                verify_unknown_user(password.to_string()).await;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let matches =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }

    fn issue_token_pair(&self, user: &User) -> Result<TokenPair> {
        let now = self.clock.now();
        Ok(TokenPair {
            access: self.tokens.encode(user.id, TokenKind::Access, now)?,
            refresh: self.tokens.encode(user.id, TokenKind::Refresh, now)?,
        })
    }

    #[tracing::instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let now = self.clock.now();
        let claims = self
            .tokens
            .decode_kind(refresh_token, TokenKind::Refresh, now)?;
        let user_id = self.existing_user(claims.sub).await?;
        self.tokens.encode(user_id, TokenKind::Access, now)
    }

    fn verify(&self, token: &str) -> Result<()> {
        self.tokens.decode(token, self.clock.now()).map(|_| ())
    }

    async fn resolve(&self, access_token: &str) -> Result<UserId> {
        let claims = self
            .tokens
            .decode_kind(access_token, TokenKind::Access, self.clock.now())?;
        self.existing_user(claims.sub).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice.b+events@example").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LEN)).is_ok());
        assert!(validate_username(&"u".repeat(MAX_USERNAME_LEN + 1)).is_err());
    }
}
