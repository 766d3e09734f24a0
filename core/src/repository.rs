//! Storage abstraction for events and their attendee lists.
//!
//! # Implementations
//!
//! - `PostgresEventRepository` (in `event-manager-postgres`): production storage
//! - `InMemoryEventRepository` (in `event-manager-testing`): fast, deterministic tests
//!
//! # Atomic membership changes
//!
//! [`EventRepository::add_attendee`] and [`EventRepository::remove_attendee`]
//! take an admission rule instead of trusting the caller to have checked the
//! event beforehand. The repository locks the event, hands the locked snapshot
//! to the rule, and mutates membership only if the rule returns
//! [`Admission::Proceed`]. Nothing else can touch the attendee list between the
//! check and the write, so two concurrent registrations for the last seat
//! cannot both succeed.

use crate::error::Result;
use crate::event::{Event, EventDraft, Membership};
use crate::id::{EventId, UserId};
use chrono::{DateTime, Utc};
use std::future::Future;

/// Decision returned by an admission rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Apply the membership change.
    Proceed,
    /// Leave the attendee list untouched and report success.
    Skip,
}

/// Durable storage of events and attendee relationships.
pub trait EventRepository: Send + Sync {
    /// Persist a new event created by `creator`.
    ///
    /// # Errors
    ///
    /// - `Validation`: the draft is invalid
    /// - `Storage`: the backing store failed
    fn create(
        &self,
        creator: UserId,
        draft: EventDraft,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<Event>> + Send;

    /// Load a single event.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no event has this id
    /// - `Storage`: the backing store failed
    fn get(&self, id: EventId) -> impl Future<Output = Result<Event>> + Send;

    /// Events created by `creator`, oldest first.
    ///
    /// # Errors
    ///
    /// - `Storage`: the backing store failed
    fn list_by_creator(&self, creator: UserId) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Every event, oldest first.
    ///
    /// # Errors
    ///
    /// - `Storage`: the backing store failed
    fn list_all(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Overwrite the editable fields of an existing event.
    ///
    /// Attendees and creator are not written. The new capacity is checked
    /// against the attendee count under the same lock as membership changes.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no event has this id
    /// - `Validation`: the capacity is below the current attendee count
    /// - `Storage`: the backing store failed
    fn update(&self, event: Event) -> impl Future<Output = Result<Event>> + Send;

    /// Delete an event together with its attendee relationships.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no event has this id
    /// - `Storage`: the backing store failed
    fn delete(&self, id: EventId) -> impl Future<Output = Result<()>> + Send;

    /// Add `user` to the attendee list if `admit` allows it.
    ///
    /// `admit` runs while the event is locked. Its error is returned unchanged
    /// and nothing is written.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no event has this id
    /// - any error produced by `admit`
    /// - `Storage`: the backing store failed
    fn add_attendee<F>(
        &self,
        event_id: EventId,
        user: UserId,
        admit: F,
    ) -> impl Future<Output = Result<Membership>> + Send
    where
        F: FnOnce(&Event) -> Result<Admission> + Send;

    /// Remove `user` from the attendee list if `admit` allows it.
    ///
    /// Same locking contract as [`EventRepository::add_attendee`].
    ///
    /// # Errors
    ///
    /// - `NotFound`: no event has this id
    /// - any error produced by `admit`
    /// - `Storage`: the backing store failed
    fn remove_attendee<F>(
        &self,
        event_id: EventId,
        user: UserId,
        admit: F,
    ) -> impl Future<Output = Result<Membership>> + Send
    where
        F: FnOnce(&Event) -> Result<Admission> + Send;

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// - `Storage`: the backing store is unreachable
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;
}
