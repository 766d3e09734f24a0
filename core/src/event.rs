//! The `Event` aggregate and the inputs that create and edit it.
//!
//! An event's phase is never stored: it is derived by comparing
//! [`Event::date`] with the clock at call time. Events dated strictly in the
//! future accept membership changes; everything else is frozen.

use crate::error::{EventError, Result};
use crate::id::{EventId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum length of an event title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum length of the `type` and `status` labels, in characters.
pub const MAX_LABEL_LEN: usize = 100;

/// A scheduled event with a capacity-bounded attendee list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// User who created the event. Never changes.
    pub creator: UserId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Display category.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Display status.
    pub status: String,
    /// Start of the event.
    pub date: DateTime<Utc>,
    /// Maximum number of attendees.
    pub capacity: u32,
    /// Registered attendees. The creator is not implicitly a member.
    pub attendees: BTreeSet<UserId>,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// When the event was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Validation`] if the draft is invalid.
    pub fn new(creator: UserId, draft: EventDraft, now: DateTime<Utc>) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id: EventId::new(),
            creator,
            title: draft.title.trim().to_string(),
            description: draft.description,
            event_type: draft.event_type,
            status: draft.status,
            date: draft.date,
            capacity: draft.capacity,
            attendees: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Number of registered attendees.
    #[must_use]
    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    /// Whether every seat is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.attendee_count() >= self.capacity as usize
    }

    /// Whether the event has started (or is starting right now) at `now`.
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.date <= now
    }

    /// Whether `user` is registered.
    #[must_use]
    pub fn is_attending(&self, user: UserId) -> bool {
        self.attendees.contains(&user)
    }

    /// Whether `user` created this event.
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.creator == user
    }

    /// Replace every editable field with the contents of `draft`.
    ///
    /// The attendee list and creator are left alone. The capacity may not
    /// drop below the number of current attendees.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Validation`] if the draft is invalid or would
    /// shrink the capacity below the attendee count.
    pub fn apply(&mut self, draft: EventDraft, now: DateTime<Utc>) -> Result<()> {
        draft.validate()?;
        self.check_capacity(draft.capacity)?;

        self.title = draft.title.trim().to_string();
        self.description = draft.description;
        self.event_type = draft.event_type;
        self.status = draft.status;
        self.date = draft.date;
        self.capacity = draft.capacity;
        self.updated_at = now;
        Ok(())
    }

    /// Check that `capacity` still seats every current attendee.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Validation`] if it does not.
    pub fn check_capacity(&self, capacity: u32) -> Result<()> {
        if (capacity as usize) < self.attendee_count() {
            return Err(EventError::Validation(format!(
                "capacity {capacity} is below the current attendee count {}",
                self.attendee_count()
            )));
        }
        Ok(())
    }

    /// The editable fields of this event as a draft.
    #[must_use]
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            event_type: self.event_type.clone(),
            status: self.status.clone(),
            date: self.date,
            capacity: self.capacity,
        }
    }
}

/// Everything needed to create an event, or to replace all its editable fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Display title. Required, not blank.
    pub title: String,
    /// Free-form description. May be empty.
    pub description: String,
    /// Display category.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Display status.
    pub status: String,
    /// Start of the event.
    pub date: DateTime<Utc>,
    /// Maximum number of attendees.
    pub capacity: u32,
}

impl EventDraft {
    /// Check field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(EventError::Validation("title must not be blank".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(EventError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        check_label("type", &self.event_type)?;
        check_label("status", &self.status)?;
        Ok(())
    }
}

fn check_label(field: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_LABEL_LEN {
        return Err(EventError::Validation(format!(
            "{field} must be at most {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

/// A partial edit. Absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New start time.
    pub date: Option<DateTime<Utc>>,
    /// New capacity.
    pub capacity: Option<u32>,
}

impl EventPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_type.is_none()
            && self.status.is_none()
            && self.date.is_none()
            && self.capacity.is_none()
    }

    /// Overlay the patch on `event`, producing a full draft.
    #[must_use]
    pub fn merge_into(self, event: &Event) -> EventDraft {
        let base = event.to_draft();
        EventDraft {
            title: self.title.unwrap_or(base.title),
            description: self.description.unwrap_or(base.description),
            event_type: self.event_type.unwrap_or(base.event_type),
            status: self.status.unwrap_or(base.status),
            date: self.date.unwrap_or(base.date),
            capacity: self.capacity.unwrap_or(base.capacity),
        }
    }
}

/// What a membership operation did to the attendee list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    /// The user was added.
    Added,
    /// The user was removed.
    Removed,
    /// The list already had the requested shape.
    Unchanged,
}

/// Outcome of a successful register or unregister call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Event whose attendee list was targeted.
    pub event_id: EventId,
    /// User who joined or left.
    pub user_id: UserId,
    /// Attendee count after the operation.
    pub attendee_count: usize,
    /// Whether anything changed.
    pub change: MembershipChange,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft {
            title: "Rust meetup".into(),
            description: "Talks and pizza".into(),
            event_type: "meetup".into(),
            status: "scheduled".into(),
            date: now() + Duration::days(7),
            capacity: 2,
        }
    }

    #[test]
    fn new_event_has_no_attendees() {
        let creator = UserId::new();
        let event = Event::new(creator, draft(), now()).unwrap();

        assert!(event.attendees.is_empty());
        assert!(!event.is_attending(creator));
        assert_eq!(event.created_at, now());
        assert_eq!(event.updated_at, now());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft();
        d.title = "   ".into();
        assert!(matches!(
            Event::new(UserId::new(), d, now()),
            Err(EventError::Validation(_))
        ));
    }

    #[test]
    fn overlong_labels_are_rejected() {
        let mut d = draft();
        d.title = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(d.validate().is_err());

        let mut d = draft();
        d.status = "s".repeat(MAX_LABEL_LEN + 1);
        assert!(d.validate().is_err());

        let mut d = draft();
        d.event_type = "t".repeat(MAX_LABEL_LEN);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn starting_now_counts_as_started() {
        let mut event = Event::new(UserId::new(), draft(), now()).unwrap();
        event.date = now();
        assert!(event.has_started(now()));
        assert!(!event.has_started(now() - Duration::seconds(1)));
    }

    #[test]
    fn capacity_cannot_drop_below_attendees() {
        let mut event = Event::new(UserId::new(), draft(), now()).unwrap();
        event.attendees.insert(UserId::new());
        event.attendees.insert(UserId::new());

        let mut shrink = draft();
        shrink.capacity = 1;
        assert!(matches!(
            event.apply(shrink, now()),
            Err(EventError::Validation(_))
        ));
        assert_eq!(event.capacity, 2);
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let event = Event::new(UserId::new(), draft(), now()).unwrap();
        let patch = EventPatch {
            status: Some("cancelled".into()),
            ..EventPatch::default()
        };

        let merged = patch.merge_into(&event);
        assert_eq!(merged.status, "cancelled");
        assert_eq!(merged.title, event.title);
        assert_eq!(merged.capacity, event.capacity);
    }

    #[test]
    fn serializes_type_field_by_its_wire_name() {
        let event = Event::new(UserId::new(), draft(), now()).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "meetup");
        assert!(json.get("event_type").is_none());
        assert!(json["attendees"].as_array().unwrap().is_empty());
    }
}
