//! # Event Manager Testing
//!
//! Testing utilities and helpers for the event manager.
//!
//! This crate provides:
//! - Deterministic clocks
//! - An in-memory [`EventRepository`](event_manager_core::repository::EventRepository)
//! - Event fixtures
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use event_manager_testing::{InMemoryEventRepository, test_clock};
//! use event_manager_core::registration::RegistrationService;
//!
//! #[tokio::test]
//! async fn registers_attendee() {
//!     let repository = Arc::new(InMemoryEventRepository::new());
//!     let service = RegistrationService::new(repository, Arc::new(test_clock()));
//!     // ...
//! }
//! ```

use chrono::{DateTime, Utc};
use event_manager_core::environment::Clock;

pub mod repository;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use event_manager_testing::mocks::FixedClock;
    /// use event_manager_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the service under test.
    ///
    /// ```
    /// use event_manager_testing::mocks::ManualClock;
    /// use event_manager_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = ManualClock::new(start);
    /// clock.advance(Duration::hours(2));
    /// assert_eq!(clock.now(), start + Duration::hours(2));
    /// ```
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward (or backward, for a negative duration).
        #[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
        pub fn advance(&self, by: Duration) {
            let mut time = self.time.lock().unwrap();
            *time += by;
        }

        /// Jump to an absolute time.
        #[allow(clippy::unwrap_used, clippy::missing_panics_doc)]
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap() = to;
        }
    }

    impl Clock for ManualClock {
        #[allow(clippy::unwrap_used)]
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }
}

/// Event fixtures relative to [`test_clock`].
pub mod fixtures {
    use super::{Clock, test_clock};
    use chrono::Duration;
    use event_manager_core::event::{Event, EventDraft};
    use event_manager_core::id::UserId;

    /// A valid draft for an event starting `offset` after the test clock.
    #[must_use]
    pub fn draft_starting_in(offset: Duration) -> EventDraft {
        EventDraft {
            title: "Rust Meetup".to_string(),
            description: "Monthly meetup".to_string(),
            event_type: "meetup".to_string(),
            status: "scheduled".to_string(),
            date: test_clock().now() + offset,
            capacity: 10,
        }
    }

    /// A valid draft with the given capacity, one day in the future.
    #[must_use]
    pub fn draft_with_capacity(capacity: u32) -> EventDraft {
        EventDraft {
            capacity,
            ..draft_starting_in(Duration::days(1))
        }
    }

    /// An event created at the test clock's time that has already started.
    ///
    /// # Panics
    ///
    /// Never, the draft is valid.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn past_event(creator: UserId) -> Event {
        let mut event = Event::new(creator, draft_starting_in(Duration::days(1)), test_clock().now())
            .expect("fixture draft is valid");
        event.date = test_clock().now() - Duration::hours(1);
        event
    }
}

/// Property-based testing strategies.
pub mod properties {
    use super::{Clock, test_clock};
    use chrono::Duration;
    use event_manager_core::event::EventDraft;
    use proptest::prelude::*;

    /// Titles that pass validation.
    pub fn valid_title() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,40}"
    }

    /// Valid drafts for events starting between one minute and thirty days
    /// after the test clock, with capacity in `0..=max_capacity`.
    pub fn future_draft(max_capacity: u32) -> impl Strategy<Value = EventDraft> {
        (
            valid_title(),
            ".{0,80}",
            "[a-z]{1,20}",
            "[a-z]{1,20}",
            1i64..=43_200,
            0..=max_capacity,
        )
            .prop_map(|(title, description, event_type, status, minutes, capacity)| {
                EventDraft {
                    title,
                    description,
                    event_type,
                    status,
                    date: test_clock().now() + Duration::minutes(minutes),
                    capacity,
                }
            })
    }

    /// Membership operations for stateful property tests.
    #[derive(Debug, Clone, Copy)]
    pub enum MembershipOp {
        /// Register the user with this index.
        Register(usize),
        /// Unregister the user with this index.
        Unregister(usize),
    }

    /// A sequence of operations over `users` distinct users.
    pub fn membership_ops(users: usize, len: usize) -> impl Strategy<Value = Vec<MembershipOp>> {
        prop::collection::vec(
            prop_oneof![
                3 => (0..users).prop_map(MembershipOp::Register),
                1 => (0..users).prop_map(MembershipOp::Unregister),
            ],
            0..len,
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use repository::InMemoryEventRepository;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn past_fixture_has_started() {
        let event = fixtures::past_event(event_manager_core::id::UserId::new());
        assert!(event.has_started(test_clock().now()));
    }
}
