//! In-memory event repository for fast, deterministic tests.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on a poisoned lock

use chrono::{DateTime, Utc};
use event_manager_core::error::{EventError, Result};
use event_manager_core::event::{Event, EventDraft, Membership, MembershipChange};
use event_manager_core::id::{EventId, UserId};
use event_manager_core::repository::{Admission, EventRepository};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// `HashMap`-backed [`EventRepository`].
///
/// A single mutex guards every event, so admission rules run with the same
/// exclusion a row lock gives the `PostgreSQL` implementation.
///
/// # Example
///
/// ```
/// use event_manager_testing::InMemoryEventRepository;
/// use event_manager_core::repository::EventRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = InMemoryEventRepository::new();
/// assert!(repository.list_all().await?.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventRepository {
    events: Arc<Mutex<HashMap<EventId, Event>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryEventRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event as-is, bypassing validation and timestamps.
    ///
    /// Useful for seeding past events or pre-filled attendee lists.
    pub fn insert(&self, event: Event) {
        self.events.lock().unwrap().insert(event.id, event);
    }

    /// Snapshot of a stored event.
    #[must_use]
    pub fn snapshot(&self, id: EventId) -> Option<Event> {
        self.events.lock().unwrap().get(&id).cloned()
    }

    /// Number of stored events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Whether the repository holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// Make every subsequent call fail with a storage error (or recover).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(EventError::Storage("in-memory repository unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn sorted(mut events: Vec<Event>) -> Vec<Event> {
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        events
    }

    fn mutate_membership<F>(
        &self,
        event_id: EventId,
        user: UserId,
        admit: F,
        add: bool,
    ) -> Result<Membership>
    where
        F: FnOnce(&Event) -> Result<Admission>,
    {
        self.check_available()?;
        let mut events = self.events.lock().unwrap();
        let event = events
            .get_mut(&event_id)
            .ok_or(EventError::NotFound(event_id))?;

        let change = match admit(event)? {
            Admission::Skip => MembershipChange::Unchanged,
            Admission::Proceed if add && event.attendees.insert(user) => MembershipChange::Added,
            Admission::Proceed if !add && event.attendees.remove(&user) => {
                MembershipChange::Removed
            }
            Admission::Proceed => MembershipChange::Unchanged,
        };

        Ok(Membership {
            event_id,
            user_id: user,
            attendee_count: event.attendee_count(),
            change,
        })
    }
}

impl EventRepository for InMemoryEventRepository {
    async fn create(
        &self,
        creator: UserId,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> Result<Event> {
        self.check_available()?;
        let event = Event::new(creator, draft, now)?;
        self.events.lock().unwrap().insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: EventId) -> Result<Event> {
        self.check_available()?;
        self.snapshot(id).ok_or(EventError::NotFound(id))
    }

    async fn list_by_creator(&self, creator: UserId) -> Result<Vec<Event>> {
        self.check_available()?;
        let events = self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.creator == creator)
            .cloned()
            .collect();
        Ok(Self::sorted(events))
    }

    async fn list_all(&self) -> Result<Vec<Event>> {
        self.check_available()?;
        let events = self.events.lock().unwrap().values().cloned().collect();
        Ok(Self::sorted(events))
    }

    async fn update(&self, event: Event) -> Result<Event> {
        self.check_available()?;
        let mut events = self.events.lock().unwrap();
        let stored = events
            .get_mut(&event.id)
            .ok_or(EventError::NotFound(event.id))?;
        stored.check_capacity(event.capacity)?;

        stored.title = event.title;
        stored.description = event.description;
        stored.event_type = event.event_type;
        stored.status = event.status;
        stored.date = event.date;
        stored.capacity = event.capacity;
        stored.updated_at = event.updated_at;
        Ok(stored.clone())
    }

    async fn delete(&self, id: EventId) -> Result<()> {
        self.check_available()?;
        self.events
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(EventError::NotFound(id))
    }

    async fn add_attendee<F>(&self, event_id: EventId, user: UserId, admit: F) -> Result<Membership>
    where
        F: FnOnce(&Event) -> Result<Admission> + Send,
    {
        self.mutate_membership(event_id, user, admit, true)
    }

    async fn remove_attendee<F>(
        &self,
        event_id: EventId,
        user: UserId,
        admit: F,
    ) -> Result<Membership>
    where
        F: FnOnce(&Event) -> Result<Admission> + Send,
    {
        self.mutate_membership(event_id, user, admit, false)
    }

    async fn ping(&self) -> Result<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::draft_starting_in;
    use crate::test_clock;
    use chrono::Duration;
    use event_manager_core::environment::Clock;

    #[tokio::test]
    async fn listings_are_ordered_by_creation() {
        let repository = InMemoryEventRepository::new();
        let creator = UserId::new();
        let t0 = test_clock().now();

        let second = repository
            .create(creator, draft_starting_in(Duration::days(1)), t0 + Duration::seconds(5))
            .await
            .unwrap();
        let first = repository
            .create(creator, draft_starting_in(Duration::days(1)), t0)
            .await
            .unwrap();
        repository
            .create(UserId::new(), draft_starting_in(Duration::days(1)), t0)
            .await
            .unwrap();

        let own = repository.list_by_creator(creator).await.unwrap();
        assert_eq!(
            own.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert_eq!(repository.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rejected_admission_leaves_attendees_alone() {
        let repository = InMemoryEventRepository::new();
        let event = repository
            .create(UserId::new(), draft_starting_in(Duration::days(1)), test_clock().now())
            .await
            .unwrap();

        let result = repository
            .add_attendee(event.id, UserId::new(), |e| {
                Err(EventError::CapacityExceeded {
                    event_id: e.id,
                    capacity: e.capacity,
                })
            })
            .await;

        assert!(result.is_err());
        assert!(repository.snapshot(event.id).unwrap().attendees.is_empty());
    }

    #[tokio::test]
    async fn unavailable_repository_fails_every_call() {
        let repository = InMemoryEventRepository::new();
        repository.set_unavailable(true);
        assert!(matches!(repository.ping().await, Err(EventError::Storage(_))));
        assert!(repository.list_all().await.is_err());

        repository.set_unavailable(false);
        assert!(repository.ping().await.is_ok());
    }
}
