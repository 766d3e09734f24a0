//! `PostgreSQL` user repository implementation.

use chrono::{DateTime, Utc};
use event_manager_auth::error::{AuthError, Result};
use event_manager_auth::providers::{User, UserRepository};
use event_manager_core::id::UserId;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// `PostgreSQL` user repository.
///
/// Provides persistent storage for user accounts.
#[derive(Clone, Debug)]
pub struct PostgresUserRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new `PostgreSQL` user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PostgresUserRepository {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Failed to get user: {e}")))?
        .map(User::from)
        .ok_or(AuthError::UserNotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Failed to get user: {e}")))?
        .map(User::from)
        .ok_or(AuthError::UserNotFound)
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Check for duplicate username constraint
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::UsernameTaken(user.username.clone());
                }
            }
            AuthError::DatabaseError(format!("Failed to create user: {e}"))
        })?;

        Ok(user.clone())
    }
}
