//! Axum integration for the event manager.
//!
//! This crate is the generic half of the HTTP boundary. It knows how to turn
//! domain errors into responses and how to pull common values out of a
//! request, but it owns no routes of its own beyond liveness.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, bearer tokens
//! │  - Request parsing                      │  ← Correlation IDs, tracing
//! │  - Response serialization               │  ← Error envelope
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Event rules and services             │  ← Testable at memory speed
//! │  - Repository and identity seams        │  ← Injected at construction
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use event_manager_web::{AppError, JsonBody};
//! use axum::{Router, routing::post, Json};
//!
//! async fn create(
//!     JsonBody(draft): JsonBody<EventDraft>,
//! ) -> Result<Json<Event>, AppError> {
//!     let event = service.create(creator, draft).await?;
//!     Ok(Json(event))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{BearerToken, JsonBody, QueryParams};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
