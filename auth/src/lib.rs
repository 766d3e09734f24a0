//! # Event Manager Authentication
//!
//! The identity store collaborator for the event manager: user accounts,
//! password verification and bearer tokens.
//!
//! ## Features
//!
//! - **Accounts**: unique usernames, Argon2id password hashes
//! - **Bearer tokens**: HS256 access/refresh pairs, refresh and verify
//! - **Injectable**: everything sits behind [`IdentityProvider`] and
//!   [`UserRepository`], so the HTTP layer runs against mocks in tests
//!
//! ## Example: Login
//!
//! ```rust,ignore
//! use event_manager_auth::*;
//!
//! let identity = IdentityService::new(users, clock, &TokenConfig::new(secret));
//!
//! identity.register_user("u1", "p1").await?;
//! let user = identity.authenticate("u1", "p1").await?;
//! let tokens = identity.issue_token_pair(&user)?;
//!
//! // Later, on every API call
//! let user_id = identity.resolve(&tokens.access).await?;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod error;
pub mod password;
pub mod providers;
pub mod service;
pub mod tokens;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::TokenConfig;
pub use error::{AuthError, Result};
pub use providers::{IdentityProvider, TokenPair, User, UserRepository};
pub use service::IdentityService;
pub use tokens::{Claims, TokenKind};
