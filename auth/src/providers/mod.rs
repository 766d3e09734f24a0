//! Identity provider interfaces.
//!
//! The event services only ever see a resolved [`UserId`]. Everything that
//! turns credentials or bearer tokens into that id sits behind the traits in
//! this module, so the HTTP layer can be tested with mocks and run in
//! production against `PostgreSQL`.

use chrono::{DateTime, Utc};
use event_manager_core::id::UserId;
use serde::{Deserialize, Serialize};

pub mod identity;
pub mod user;

pub use identity::IdentityProvider;
pub use user::UserRepository;

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Argon2 hash in PHC string format.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Access and refresh tokens issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token for API calls.
    pub access: String,
    /// Longer-lived token exchanged for new access tokens.
    pub refresh: String,
}
