//! Registration rules exercised against the in-memory repository.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::Duration;
use event_manager_core::environment::Clock;
use event_manager_core::error::{EventError, MembershipAction};
use event_manager_core::event::MembershipChange;
use event_manager_core::id::{EventId, UserId};
use event_manager_core::registration::RegistrationService;
use event_manager_core::repository::EventRepository;
use event_manager_testing::fixtures::{draft_starting_in, draft_with_capacity, past_event};
use event_manager_testing::properties::{MembershipOp, future_draft, membership_ops};
use event_manager_testing::{FixedClock, InMemoryEventRepository, ManualClock, test_clock};
use proptest::prelude::*;
use std::sync::Arc;

fn service(
    repository: &Arc<InMemoryEventRepository>,
) -> RegistrationService<InMemoryEventRepository, FixedClock> {
    RegistrationService::new(Arc::clone(repository), Arc::new(test_clock()))
}

async fn seed(repository: &InMemoryEventRepository, capacity: u32) -> EventId {
    repository
        .create(UserId::new(), draft_with_capacity(capacity), test_clock().now())
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn second_registration_for_single_seat_is_rejected() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let registrations = service(&repository);
    let event_id = seed(&repository, 1).await;
    let (a, b) = (UserId::new(), UserId::new());

    let first = registrations.register(event_id, a).await.unwrap();
    assert_eq!(first.change, MembershipChange::Added);
    assert_eq!(first.attendee_count, 1);

    let second = registrations.register(event_id, b).await;
    assert_eq!(
        second,
        Err(EventError::CapacityExceeded {
            event_id,
            capacity: 1
        })
    );

    let stored = repository.snapshot(event_id).unwrap();
    assert!(stored.is_attending(a));
    assert!(!stored.is_attending(b));
}

#[tokio::test]
async fn past_event_rejects_both_directions_without_mutation() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let registrations = service(&repository);
    let attendee = UserId::new();
    let mut event = past_event(UserId::new());
    event.attendees.insert(attendee);
    let event_id = event.id;
    repository.insert(event.clone());

    assert_eq!(
        registrations.register(event_id, UserId::new()).await,
        Err(EventError::PastEvent {
            event_id,
            action: MembershipAction::Register
        })
    );
    assert_eq!(
        registrations.unregister(event_id, attendee).await,
        Err(EventError::PastEvent {
            event_id,
            action: MembershipAction::Unregister
        })
    );
    assert_eq!(repository.snapshot(event_id).unwrap().attendees, event.attendees);
}

#[tokio::test]
async fn registering_twice_is_idempotent_even_when_full() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let registrations = service(&repository);
    let event_id = seed(&repository, 1).await;
    let user = UserId::new();

    registrations.register(event_id, user).await.unwrap();
    let again = registrations.register(event_id, user).await.unwrap();

    assert_eq!(again.change, MembershipChange::Unchanged);
    assert_eq!(again.attendee_count, 1);
}

#[tokio::test]
async fn unregistering_a_non_attendee_is_a_no_op() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let registrations = service(&repository);
    let event_id = seed(&repository, 2).await;
    let member = UserId::new();
    registrations.register(event_id, member).await.unwrap();

    let result = registrations.unregister(event_id, UserId::new()).await.unwrap();
    assert_eq!(result.change, MembershipChange::Unchanged);
    assert_eq!(result.attendee_count, 1);

    let removed = registrations.unregister(event_id, member).await.unwrap();
    assert_eq!(removed.change, MembershipChange::Removed);
    assert_eq!(removed.attendee_count, 0);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let registrations = service(&repository);
    let missing = EventId::new();

    assert_eq!(
        registrations.register(missing, UserId::new()).await,
        Err(EventError::NotFound(missing))
    );
    assert_eq!(
        registrations.unregister(missing, UserId::new()).await,
        Err(EventError::NotFound(missing))
    );
}

#[tokio::test]
async fn event_freezes_once_its_start_time_arrives() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let clock = ManualClock::new(test_clock().now());
    let registrations = RegistrationService::new(Arc::clone(&repository), Arc::new(clock.clone()));
    let event = repository
        .create(UserId::new(), draft_starting_in(Duration::hours(1)), clock.now())
        .await
        .unwrap();
    let user = UserId::new();

    registrations.register(event.id, user).await.unwrap();

    clock.set(event.date);
    assert!(matches!(
        registrations.unregister(event.id, user).await,
        Err(EventError::PastEvent { .. })
    ));
    assert!(repository.snapshot(event.id).unwrap().is_attending(user));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_for_last_seat_admit_exactly_one() {
    let repository = Arc::new(InMemoryEventRepository::new());
    let registrations = service(&repository);
    let event_id = seed(&repository, 3).await;
    registrations.register(event_id, UserId::new()).await.unwrap();
    registrations.register(event_id, UserId::new()).await.unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let registrations = registrations.clone();
            tokio::spawn(async move { registrations.register(event_id, UserId::new()).await })
        })
        .collect();

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(EventError::CapacityExceeded { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!((admitted, rejected), (1, 1));
    assert_eq!(repository.snapshot(event_id).unwrap().attendee_count(), 3);
}

proptest! {
    #[test]
    fn attendee_count_never_exceeds_capacity(
        draft in future_draft(5),
        ops in membership_ops(8, 40),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let repository = Arc::new(InMemoryEventRepository::new());
            let registrations = service(&repository);
            let capacity = draft.capacity as usize;
            let event = repository.create(UserId::new(), draft, test_clock().now()).await.unwrap();
            let users: Vec<UserId> = (0..8).map(|_| UserId::new()).collect();

            for op in ops {
                let before = repository.snapshot(event.id).unwrap().attendees;
                let result = match op {
                    MembershipOp::Register(i) => registrations.register(event.id, users[i]).await,
                    MembershipOp::Unregister(i) => registrations.unregister(event.id, users[i]).await,
                };
                let after = repository.snapshot(event.id).unwrap().attendees;

                prop_assert!(after.len() <= capacity);
                if result.is_err() {
                    prop_assert_eq!(before, after);
                }
            }
            Ok(())
        })?;
    }
}
