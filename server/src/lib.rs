//! # Event Manager Server
//!
//! The HTTP boundary of the event manager: configuration, application
//! state, routes, handlers and metrics export.
//!
//! ## Architecture
//!
//! ```text
//! HTTP ──► axum router ──► handlers (api/*)
//!                              │
//!                              ├─► IdentityProvider   (event-manager-auth)
//!                              └─► domain services    (event-manager-core)
//!                                        │
//!                                        └─► EventRepository (event-manager-postgres)
//! ```
//!
//! Handlers are generic over the repository, identity provider and clock,
//! so the integration tests drive the real router against in-memory
//! collaborators.

pub mod api;
pub mod auth;
pub mod config;
pub mod metrics;
pub mod server;

pub use auth::AuthUser;
pub use config::Config;
pub use server::{AppState, build_router};
