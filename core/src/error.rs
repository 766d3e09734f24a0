//! Error taxonomy for the event domain.

use crate::id::EventId;
use std::fmt;
use thiserror::Error;

/// Result type for event domain operations.
pub type Result<T> = std::result::Result<T, EventError>;

/// Which membership change was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    /// Joining the attendee list.
    Register,
    /// Leaving the attendee list.
    Unregister,
}

impl fmt::Display for MembershipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => f.write_str("register for"),
            Self::Unregister => f.write_str("unregister from"),
        }
    }
}

/// Errors raised by the event repository and the domain services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    // ═══════════════════════════════════════════════════════════
    // Client errors
    // ═══════════════════════════════════════════════════════════
    /// Malformed or missing input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The event does not exist.
    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// The event exists but belongs to another user.
    ///
    /// The HTTP boundary renders this exactly like [`EventError::NotFound`].
    #[error("Event {0} is not owned by the caller")]
    Forbidden(EventId),

    /// The event has already started.
    #[error("Cannot {action} past events")]
    PastEvent {
        /// Event the caller targeted.
        event_id: EventId,
        /// Attempted change.
        action: MembershipAction,
    },

    /// The attendee list is already at capacity.
    #[error("Event {event_id} is full (capacity {capacity})")]
    CapacityExceeded {
        /// Event the caller targeted.
        event_id: EventId,
        /// Configured capacity.
        capacity: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // Infrastructure errors
    // ═══════════════════════════════════════════════════════════
    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EventError {
    /// Short label used for metrics and logs.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid",
            Self::NotFound(_) | Self::Forbidden(_) => "not_found",
            Self::PastEvent { .. } => "past_event",
            Self::CapacityExceeded { .. } => "full",
            Self::Storage(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_event_messages_name_the_action() {
        let id = EventId::new();
        let register = EventError::PastEvent {
            event_id: id,
            action: MembershipAction::Register,
        };
        let unregister = EventError::PastEvent {
            event_id: id,
            action: MembershipAction::Unregister,
        };

        assert_eq!(register.to_string(), "Cannot register for past events");
        assert_eq!(unregister.to_string(), "Cannot unregister from past events");
    }

    #[test]
    fn forbidden_shares_the_not_found_outcome() {
        let id = EventId::new();
        assert_eq!(
            EventError::Forbidden(id).outcome(),
            EventError::NotFound(id).outcome()
        );
    }
}
