//! HTTP handlers, grouped by resource.
//!
//! Handlers are generic over the event repository, identity provider and
//! clock carried by [`AppState`](crate::server::AppState), so the same code
//! serves production and the in-memory test harness.

pub mod accounts;
pub mod events;
pub mod registrations;
