//! Strongly typed identifiers for users and events.
//!
//! Both identifiers wrap a UUID v4. They are `Copy`, totally ordered and
//! serialise transparently, so `{"event_id": "6f1c..."}` round-trips without
//! any wrapper object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when an identifier cannot be parsed from user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} ID: {value}")]
pub struct ParseIdError {
    kind: &'static str,
    value: String,
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// The underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| ParseIdError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

uuid_id!(
    /// Identifier of a user account, assigned by the identity store.
    UserId,
    "user"
);

uuid_id!(
    /// Identifier of an event, assigned when the event is created.
    ///
    /// # Examples
    ///
    /// ```
    /// use event_manager_core::id::EventId;
    ///
    /// let id = EventId::new();
    /// let parsed: EventId = id.to_string().parse().unwrap();
    /// assert_eq!(parsed, id);
    /// ```
    EventId,
    "event"
);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<EventId>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid event ID: not-a-uuid");
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let id = UserId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(EventId::new(), EventId::new());
    }
}
