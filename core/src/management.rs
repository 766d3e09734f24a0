//! Creating, editing and deleting events on behalf of their creator.

use crate::environment::Clock;
use crate::error::{EventError, Result};
use crate::event::{Event, EventDraft, EventPatch};
use crate::id::{EventId, UserId};
use crate::repository::EventRepository;
use std::sync::Arc;

/// Write-side operations restricted to the event's creator.
///
/// Ownership failures surface as [`EventError::Forbidden`].
pub struct EventManagementService<R, C> {
    events: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for EventManagementService<R, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: EventRepository, C: Clock> EventManagementService<R, C> {
    /// Create a service over the given repository and clock.
    #[must_use]
    pub const fn new(events: Arc<R>, clock: Arc<C>) -> Self {
        Self { events, clock }
    }

    /// Create an event owned by `creator`.
    ///
    /// The creator is not added to the attendee list.
    ///
    /// # Errors
    ///
    /// - `Validation`: the draft is invalid
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, creator: UserId, draft: EventDraft) -> Result<Event> {
        draft.validate()?;
        let event = self.events.create(creator, draft, self.clock.now()).await?;

        metrics::counter!("event_manager_events_created_total").increment(1);
        tracing::info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Replace every editable field of an owned event.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Forbidden`: missing or not owned by `user`
    /// - `Validation`: the draft is invalid or shrinks capacity below the attendee count
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self, draft))]
    pub async fn update_own(
        &self,
        user: UserId,
        event_id: EventId,
        draft: EventDraft,
    ) -> Result<Event> {
        let mut event = self.owned(user, event_id).await?;
        event.apply(draft, self.clock.now())?;
        self.events.update(event).await
    }

    /// Apply a partial edit to an owned event.
    ///
    /// # Errors
    ///
    /// Same as [`EventManagementService::update_own`].
    #[tracing::instrument(skip(self, patch))]
    pub async fn patch_own(
        &self,
        user: UserId,
        event_id: EventId,
        patch: EventPatch,
    ) -> Result<Event> {
        let mut event = self.owned(user, event_id).await?;
        if patch.is_empty() {
            return Ok(event);
        }
        let draft = patch.merge_into(&event);
        event.apply(draft, self.clock.now())?;
        self.events.update(event).await
    }

    /// Delete an owned event and its attendee relationships.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Forbidden`: missing or not owned by `user`
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self))]
    pub async fn delete_own(&self, user: UserId, event_id: EventId) -> Result<()> {
        self.owned(user, event_id).await?;
        self.events.delete(event_id).await?;
        tracing::info!("Event deleted");
        Ok(())
    }

    async fn owned(&self, user: UserId, event_id: EventId) -> Result<Event> {
        let event = self.events.get(event_id).await?;
        if event.is_owned_by(user) {
            Ok(event)
        } else {
            Err(EventError::Forbidden(event_id))
        }
    }
}
