//! Mock user repository for testing.

use crate::error::{AuthError, Result};
use crate::providers::{User, UserRepository};
use event_manager_core::id::UserId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock user repository.
///
/// Uses in-memory storage for testing.
#[derive(Debug, Clone)]
pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    users_by_username: Arc<Mutex<HashMap<String, UserId>>>,
}

impl MockUserRepository {
    /// Create a new mock user repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            users_by_username: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Remove a user, as if the account had been deleted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InternalError` if a lock is poisoned.
    pub fn remove_user(&self, user_id: UserId) -> Result<Option<User>> {
        let mut users = self.users.lock().map_err(|_| AuthError::InternalError)?;
        let mut by_username = self
            .users_by_username
            .lock()
            .map_err(|_| AuthError::InternalError)?;

        let removed = users.remove(&user_id);
        if let Some(user) = &removed {
            by_username.remove(&user.username);
        }
        Ok(removed)
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    /// Whether no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MockUserRepository {
    fn get_user_by_id(&self, user_id: UserId) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);

        async move {
            users
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&user_id)
                .cloned()
                .ok_or(AuthError::UserNotFound)
        }
    }

    fn get_user_by_username(&self, username: &str) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);
        let users_by_username = Arc::clone(&self.users_by_username);
        let username = username.to_string();

        async move {
            let user_id = users_by_username
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&username)
                .copied()
                .ok_or(AuthError::UserNotFound)?;

            users
                .lock()
                .map_err(|_| AuthError::InternalError)?
                .get(&user_id)
                .cloned()
                .ok_or(AuthError::UserNotFound)
        }
    }

    fn create_user(&self, user: &User) -> impl Future<Output = Result<User>> + Send {
        let users = Arc::clone(&self.users);
        let users_by_username = Arc::clone(&self.users_by_username);
        let user = user.clone();

        async move {
            let mut users_guard = users.lock().map_err(|_| AuthError::InternalError)?;
            let mut username_guard = users_by_username
                .lock()
                .map_err(|_| AuthError::InternalError)?;

            // Check if username already exists
            if username_guard.contains_key(&user.username) {
                return Err(AuthError::UsernameTaken(user.username));
            }

            username_guard.insert(user.username.clone(), user.id);
            users_guard.insert(user.id, user.clone());

            Ok(user)
        }
    }
}
