//! Rows of the events query.

use diesel::prelude::*;
use icsfeed_core::types::Event;

/// One event joined with its category name.
///
/// Field order matches the select list in `query::event`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub timestart: i64,
    pub timeduration: i64,
    pub timemodified: i64,
    pub categoryid: i64,
    pub category_name: String,
    pub location: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description_html: row.description.unwrap_or_default(),
            start_epoch: row.timestart,
            duration_seconds: row.timeduration,
            modified_epoch: row.timemodified,
            category_id: row.categoryid,
            category_name: row.category_name,
            location: row.location.unwrap_or_default(),
        }
    }
}
