//! Read-side access to events.

use crate::error::{EventError, Result};
use crate::event::Event;
use crate::id::{EventId, UserId};
use crate::repository::EventRepository;
use std::sync::Arc;

/// Lists and retrieves events, scoped by ownership or unscoped.
pub struct EventQueryService<R> {
    events: Arc<R>,
}

impl<R> Clone for EventQueryService<R> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<R: EventRepository> EventQueryService<R> {
    /// Create a service over the given repository.
    #[must_use]
    pub const fn new(events: Arc<R>) -> Self {
        Self { events }
    }

    /// Events created by `user`.
    ///
    /// # Errors
    ///
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self))]
    pub async fn list_own(&self, user: UserId) -> Result<Vec<Event>> {
        self.events.list_by_creator(user).await
    }

    /// A single event, only if `user` created it.
    ///
    /// # Errors
    ///
    /// - `NotFound`: the event does not exist
    /// - `Forbidden`: the event belongs to someone else
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self))]
    pub async fn get_own_detail(&self, user: UserId, event_id: EventId) -> Result<Event> {
        let event = self.events.get(event_id).await?;
        if !event.is_owned_by(user) {
            tracing::debug!("Detail requested by non-owner");
            return Err(EventError::Forbidden(event_id));
        }
        Ok(event)
    }

    /// Every event regardless of owner.
    ///
    /// # Errors
    ///
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Event>> {
        self.events.list_all().await
    }
}
