//! Error types for authentication operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the identity store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Registration Errors
    // ═══════════════════════════════════════════════════════════
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Another account already uses this username.
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════
    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token is malformed, has a bad signature, is of the wrong kind or
    /// names a user that no longer exists.
    #[error("Invalid token")]
    InvalidToken,

    /// Token signature is valid but it has expired.
    #[error("Token has expired")]
    TokenExpired,

    /// No user with the requested id or username.
    #[error("User not found")]
    UserNotFound,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════
    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Internal server error (should not be exposed to users).
    #[error("Internal error")]
    InternalError,
}

impl AuthError {
    /// Returns `true` if this error is due to invalid user input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use event_manager_auth::AuthError;
    /// assert!(AuthError::InvalidCredentials.is_user_error());
    /// assert!(!AuthError::InternalError.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UsernameTaken(_)
                | Self::InvalidCredentials
                | Self::InvalidToken
                | Self::TokenExpired
                | Self::UserNotFound
        )
    }

    /// Returns `true` if the error concerns a bearer token.
    #[must_use]
    pub const fn is_token_error(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::TokenExpired)
    }
}
