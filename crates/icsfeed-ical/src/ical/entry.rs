//! Mapping from stored events to calendar entries.

use icsfeed_core::types::Event;

use super::stamp::encode_timestamp;
use super::strip::strip_tags;

/// The values a template can substitute into one entry block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    /// `<event id>-<category id>`, stable across regenerations.
    pub uid: String,
    pub summary: String,
    /// Event description with markup removed.
    pub description: String,
    pub start_stamp: String,
    pub end_stamp: String,
    pub last_modified_stamp: String,
    pub location: String,
}

impl CalendarEntry {
    /// ## Summary
    /// Builds the entry for `event`.
    ///
    /// Never fails: every epoch value yields a valid stamp, and a negative
    /// duration is passed through as an end before the start.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            uid: entry_uid(event.id, event.category_id),
            summary: event.name.clone(),
            description: strip_tags(&event.description_html).into_owned(),
            start_stamp: encode_timestamp(event.start_epoch),
            end_stamp: encode_timestamp(event.end_epoch()),
            last_modified_stamp: encode_timestamp(event.modified_epoch),
            location: event.location.clone(),
        }
    }
}

impl From<&Event> for CalendarEntry {
    fn from(event: &Event) -> Self {
        Self::from_event(event)
    }
}

/// ## Summary
/// Formats `event` as a calendar entry.
#[must_use]
pub fn format_event(event: &Event) -> CalendarEntry {
    CalendarEntry::from_event(event)
}

/// ## Summary
/// Returns the entry UID for an event within a category.
#[must_use]
pub fn entry_uid(event_id: i64, category_id: i64) -> String {
    format!("{event_id}-{category_id}")
}
