//! User repository trait.

use super::User;
use crate::error::Result;
use event_manager_core::id::UserId;
use std::future::Future;

/// User repository.
///
/// This trait abstracts over user storage (`PostgreSQL` in production,
/// an in-memory map in tests).
pub trait UserRepository: Send + Sync {
    /// Get user by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn get_user_by_id(&self, user_id: UserId) -> impl Future<Output = Result<User>> + Send;

    /// Get user by username.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - User not found → `AuthError::UserNotFound`
    fn get_user_by_username(&self, username: &str) -> impl Future<Output = Result<User>> + Send;

    /// Create user.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Username already exists → `AuthError::UsernameTaken`
    fn create_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send;
}
