//! `PostgreSQL` storage for the event manager.
//!
//! This crate provides production implementations of the storage traits:
//!
//! - [`PostgresEventRepository`]: events and attendee lists, with per-event
//!   row locking for membership changes
//! - [`PostgresUserRepository`]: user accounts for the identity store
//!
//! Both share one schema, created by [`migrate`].
//!
//! # Example
//!
//! ```ignore
//! use event_manager_postgres::{PostgresEventRepository, PostgresUserRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = sqlx::PgPool::connect("postgres://localhost/events").await?;
//!     event_manager_postgres::migrate(&pool).await?;
//!     let events = PostgresEventRepository::new(pool.clone());
//!     let users = PostgresUserRepository::new(pool);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use sqlx::PgPool;
use thiserror::Error;

pub mod events;
pub mod users;

pub use events::PostgresEventRepository;
pub use users::PostgresUserRepository;

/// Errors raised while preparing the database.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A migration failed to apply.
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply the embedded migrations (`users`, `events`, `event_attendees`).
///
/// # Errors
///
/// Returns [`SchemaError::Migration`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), SchemaError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
