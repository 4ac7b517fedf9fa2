//! Records read from the event store.
//!
//! Both types are snapshots: they are read fresh every cycle and dropped once
//! the category's feed has been written.

/// A grouping of events. Every category with at least one event gets its own
/// feed file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// One calendar event as stored, with its category denormalized onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    /// Description as entered, possibly containing HTML markup.
    pub description_html: String,
    /// Start instant, seconds since the Unix epoch (UTC).
    pub start_epoch: i64,
    /// Length of the event in seconds. May be zero or negative.
    pub duration_seconds: i64,
    /// Last modification instant, seconds since the Unix epoch (UTC).
    pub modified_epoch: i64,
    pub category_id: i64,
    pub category_name: String,
    pub location: String,
}

impl Event {
    /// ## Summary
    /// Returns the end instant (`start + duration`), saturating at the `i64`
    /// bounds instead of overflowing.
    #[must_use]
    pub const fn end_epoch(&self) -> i64 {
        self.start_epoch.saturating_add(self.duration_seconds)
    }
}
