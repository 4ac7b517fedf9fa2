//! Rows of the categories query.

use diesel::prelude::*;
use icsfeed_core::types::Category;

/// `(id, name)` of a category that has events.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}
