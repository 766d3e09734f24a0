//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of the provider
//! traits for use in unit and integration tests.

pub mod user;

pub use user::MockUserRepository;
