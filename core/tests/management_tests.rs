//! Ownership-scoped reads and writes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::Duration;
use event_manager_core::error::EventError;
use event_manager_core::event::EventPatch;
use event_manager_core::id::{EventId, UserId};
use event_manager_core::management::EventManagementService;
use event_manager_core::query::EventQueryService;
use event_manager_core::registration::RegistrationService;
use event_manager_testing::fixtures::{draft_starting_in, draft_with_capacity};
use event_manager_testing::{FixedClock, InMemoryEventRepository, test_clock};
use std::sync::Arc;

struct Services {
    repository: Arc<InMemoryEventRepository>,
    management: EventManagementService<InMemoryEventRepository, FixedClock>,
    queries: EventQueryService<InMemoryEventRepository>,
    registrations: RegistrationService<InMemoryEventRepository, FixedClock>,
}

fn services() -> Services {
    let repository = Arc::new(InMemoryEventRepository::new());
    let clock = Arc::new(test_clock());
    Services {
        management: EventManagementService::new(Arc::clone(&repository), Arc::clone(&clock)),
        queries: EventQueryService::new(Arc::clone(&repository)),
        registrations: RegistrationService::new(Arc::clone(&repository), clock),
        repository,
    }
}

#[tokio::test]
async fn creator_is_not_an_attendee() {
    let s = services();
    let creator = UserId::new();
    let event = s
        .management
        .create(creator, draft_starting_in(Duration::days(2)))
        .await
        .unwrap();

    assert_eq!(event.creator, creator);
    assert!(event.attendees.is_empty());
}

#[tokio::test]
async fn invalid_draft_is_not_persisted() {
    let s = services();
    let mut draft = draft_starting_in(Duration::days(2));
    draft.title = String::new();

    let result = s.management.create(UserId::new(), draft).await;
    assert!(matches!(result, Err(EventError::Validation(_))));
    assert!(s.repository.is_empty());
}

#[tokio::test]
async fn listings_are_scoped_by_owner() {
    let s = services();
    let (alice, bob) = (UserId::new(), UserId::new());
    s.management
        .create(alice, draft_starting_in(Duration::days(1)))
        .await
        .unwrap();
    s.management
        .create(bob, draft_starting_in(Duration::days(1)))
        .await
        .unwrap();

    let own = s.queries.list_own(alice).await.unwrap();
    assert_eq!(own.len(), 1);
    assert!(own.iter().all(|e| e.creator == alice));
    assert_eq!(s.queries.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn other_users_event_is_forbidden() {
    let s = services();
    let (owner, stranger) = (UserId::new(), UserId::new());
    let event = s
        .management
        .create(owner, draft_starting_in(Duration::days(1)))
        .await
        .unwrap();

    assert_eq!(
        s.queries.get_own_detail(stranger, event.id).await,
        Err(EventError::Forbidden(event.id))
    );
    assert_eq!(
        s.management.delete_own(stranger, event.id).await,
        Err(EventError::Forbidden(event.id))
    );
    assert_eq!(
        s.queries.get_own_detail(owner, event.id).await.unwrap().id,
        event.id
    );

    let missing = EventId::new();
    assert_eq!(
        s.queries.get_own_detail(owner, missing).await,
        Err(EventError::NotFound(missing))
    );
}

#[tokio::test]
async fn put_replaces_and_patch_merges() {
    let s = services();
    let owner = UserId::new();
    let event = s
        .management
        .create(owner, draft_starting_in(Duration::days(1)))
        .await
        .unwrap();

    let mut replacement = draft_starting_in(Duration::days(3));
    replacement.title = "Renamed".into();
    let updated = s
        .management
        .update_own(owner, event.id, replacement)
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.date, test_clock_now() + Duration::days(3));

    let patched = s
        .management
        .patch_own(
            owner,
            event.id,
            EventPatch {
                status: Some("cancelled".into()),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.status, "cancelled");
    assert_eq!(patched.title, "Renamed");
}

#[tokio::test]
async fn capacity_edit_cannot_evict_attendees() {
    let s = services();
    let owner = UserId::new();
    let event = s
        .management
        .create(owner, draft_with_capacity(3))
        .await
        .unwrap();
    s.registrations.register(event.id, UserId::new()).await.unwrap();
    s.registrations.register(event.id, UserId::new()).await.unwrap();

    let result = s
        .management
        .patch_own(
            owner,
            event.id,
            EventPatch {
                capacity: Some(1),
                ..EventPatch::default()
            },
        )
        .await;

    assert!(matches!(result, Err(EventError::Validation(_))));
    assert_eq!(s.repository.snapshot(event.id).unwrap().capacity, 3);
}

#[tokio::test]
async fn delete_cascades_attendees() {
    let s = services();
    let owner = UserId::new();
    let event = s
        .management
        .create(owner, draft_with_capacity(3))
        .await
        .unwrap();
    s.registrations.register(event.id, UserId::new()).await.unwrap();

    s.management.delete_own(owner, event.id).await.unwrap();

    assert!(s.repository.snapshot(event.id).is_none());
    assert_eq!(
        s.registrations.register(event.id, UserId::new()).await,
        Err(EventError::NotFound(event.id))
    );
}

fn test_clock_now() -> chrono::DateTime<chrono::Utc> {
    use event_manager_core::environment::Clock;
    test_clock().now()
}
