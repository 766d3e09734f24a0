//! HTTP server module.
//!
//! - Application state management
//! - Readiness probe
//! - Router configuration

pub mod health;
pub mod routes;
pub mod state;

pub use health::readiness_check;
pub use routes::build_router;
pub use state::AppState;
