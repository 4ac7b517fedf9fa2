//! iCalendar feed generation.
//!
//! - Stamp: epoch seconds to basic-format UTC date-times
//! - Strip: HTML tag removal for descriptions
//! - Entry: event record to calendar entry mapping
//! - Escape: TEXT value escaping, available as a template filter
//! - Template: field-substitution templates for entry blocks
//! - Feed: the `VCALENDAR` envelope around rendered entries

mod entry;
mod escape;
mod feed;
mod stamp;
mod strip;
mod template;

pub use entry::{CalendarEntry, entry_uid, format_event};
pub use escape::escape_text;
pub use feed::{FEED_FOOTER, FeedEnvelope};
pub use stamp::encode_timestamp;
pub use strip::strip_tags;
pub use template::{EntryTemplate, Field, Filter};
