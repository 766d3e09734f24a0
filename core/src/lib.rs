//! # Event Manager Core
//!
//! Domain types and services for the event manager.
//!
//! This crate has no I/O of its own. Storage sits behind
//! [`repository::EventRepository`] and time behind [`environment::Clock`];
//! both are injected when a service is constructed.
//!
//! ## Services
//!
//! - [`registration::RegistrationService`]: joins and leaves events under the
//!   capacity and timing rules
//! - [`query::EventQueryService`]: owner-scoped and public listings
//! - [`management::EventManagementService`]: create, edit and delete owned events
//!
//! ## Example
//!
//! ```ignore
//! use event_manager_core::registration::RegistrationService;
//! use std::sync::Arc;
//!
//! let service = RegistrationService::new(Arc::new(repository), Arc::new(SystemClock));
//! let membership = service.register(event_id, user_id).await?;
//! println!("{} attending", membership.attendee_count);
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod error;
pub mod event;
pub mod id;
pub mod management;
pub mod query;
pub mod registration;
pub mod repository;

pub use error::{EventError, MembershipAction};
pub use event::{Event, EventDraft, EventPatch, Membership, MembershipChange};
pub use id::{EventId, ParseIdError, UserId};
pub use repository::{Admission, EventRepository};

/// Environment module - injected dependencies.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Every "is this event in the past" decision reads the time through
    /// this trait, so tests can pin it.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
        fn now(&self) -> DateTime<Utc> {
            (**self).now()
        }
    }
}
