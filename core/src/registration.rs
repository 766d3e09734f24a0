//! Joining and leaving events.
//!
//! Rules, in the order they are checked against the locked event:
//!
//! 1. The event must exist (`NotFound`).
//! 2. The event must start strictly after "now" (`PastEvent`).
//! 3. Registering when already attending succeeds without changes, even if
//!    the event is full. Unregistering when not attending does the same.
//! 4. A new registration needs a free seat (`CapacityExceeded`).

use crate::environment::Clock;
use crate::error::{EventError, MembershipAction, Result};
use crate::event::{Event, Membership};
use crate::id::{EventId, UserId};
use crate::repository::{Admission, EventRepository};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Admission rule for [`RegistrationService::register`].
///
/// # Errors
///
/// - `PastEvent`: the event has started
/// - `CapacityExceeded`: no seat is left for a new attendee
pub fn admit_registration(event: &Event, user: UserId, now: DateTime<Utc>) -> Result<Admission> {
    if event.has_started(now) {
        return Err(EventError::PastEvent {
            event_id: event.id,
            action: MembershipAction::Register,
        });
    }
    if event.is_attending(user) {
        return Ok(Admission::Skip);
    }
    if event.is_full() {
        return Err(EventError::CapacityExceeded {
            event_id: event.id,
            capacity: event.capacity,
        });
    }
    Ok(Admission::Proceed)
}

/// Admission rule for [`RegistrationService::unregister`].
///
/// # Errors
///
/// - `PastEvent`: the event has started
pub fn admit_unregistration(
    event: &Event,
    user: UserId,
    now: DateTime<Utc>,
) -> Result<Admission> {
    if event.has_started(now) {
        return Err(EventError::PastEvent {
            event_id: event.id,
            action: MembershipAction::Unregister,
        });
    }
    if event.is_attending(user) {
        Ok(Admission::Proceed)
    } else {
        Ok(Admission::Skip)
    }
}

/// Enforces capacity and timing rules on attendee lists.
pub struct RegistrationService<R, C> {
    events: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for RegistrationService<R, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: EventRepository, C: Clock> RegistrationService<R, C> {
    /// Create a service over the given repository and clock.
    #[must_use]
    pub const fn new(events: Arc<R>, clock: Arc<C>) -> Self {
        Self { events, clock }
    }

    /// Add `user` to the attendees of `event_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound`: the event does not exist
    /// - `PastEvent`: the event has started
    /// - `CapacityExceeded`: the event is full
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, event_id: EventId, user: UserId) -> Result<Membership> {
        let now = self.clock.now();
        let result = self
            .events
            .add_attendee(event_id, user, move |event| {
                admit_registration(event, user, now)
            })
            .await;

        record("event_manager_registrations_total", &result);
        result
    }

    /// Remove `user` from the attendees of `event_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound`: the event does not exist
    /// - `PastEvent`: the event has started
    /// - `Storage`: the repository failed
    #[tracing::instrument(skip(self))]
    pub async fn unregister(&self, event_id: EventId, user: UserId) -> Result<Membership> {
        let now = self.clock.now();
        let result = self
            .events
            .remove_attendee(event_id, user, move |event| {
                admit_unregistration(event, user, now)
            })
            .await;

        record("event_manager_unregistrations_total", &result);
        result
    }
}

fn record(counter: &'static str, result: &Result<Membership>) {
    let outcome = match result {
        Ok(membership) => {
            tracing::info!(
                attendee_count = membership.attendee_count,
                change = ?membership.change,
                "Membership updated"
            );
            "ok"
        }
        Err(EventError::Storage(reason)) => {
            tracing::error!(reason = %reason, "Membership change failed");
            "error"
        }
        Err(e) => {
            tracing::debug!(error = %e, "Membership change rejected");
            e.outcome()
        }
    };
    metrics::counter!(counter, "outcome" => outcome).increment(1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::event::EventDraft;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn event(capacity: u32, starts_in: Duration) -> Event {
        Event::new(
            UserId::new(),
            EventDraft {
                title: "Launch".into(),
                description: String::new(),
                event_type: "party".into(),
                status: "open".into(),
                date: now() + starts_in,
                capacity,
            },
            now(),
        )
        .unwrap()
    }

    #[test]
    fn past_check_runs_before_idempotency() {
        let user = UserId::new();
        let mut e = event(1, Duration::hours(-1));
        e.attendees.insert(user);

        assert!(matches!(
            admit_registration(&e, user, now()),
            Err(EventError::PastEvent { .. })
        ));
        assert!(matches!(
            admit_unregistration(&e, user, now()),
            Err(EventError::PastEvent { .. })
        ));
    }

    #[test]
    fn existing_attendee_of_full_event_is_skipped() {
        let user = UserId::new();
        let mut e = event(1, Duration::days(1));
        e.attendees.insert(user);

        assert_eq!(admit_registration(&e, user, now()), Ok(Admission::Skip));
        assert!(matches!(
            admit_registration(&e, UserId::new(), now()),
            Err(EventError::CapacityExceeded { capacity: 1, .. })
        ));
    }

    #[test]
    fn zero_capacity_admits_nobody() {
        let e = event(0, Duration::days(1));
        assert!(admit_registration(&e, UserId::new(), now()).is_err());
    }

    #[test]
    fn unregistering_a_stranger_is_skipped() {
        let e = event(3, Duration::days(1));
        assert_eq!(
            admit_unregistration(&e, UserId::new(), now()),
            Ok(Admission::Skip)
        );
    }
}
