//! Query composition for events.

use diesel::dsl::{Eq, Filter, InnerJoin, Order, Select};
use diesel::prelude::*;
use diesel_async::methods::LoadQuery;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::schema::{mdl_course_categories, mdl_event};
use crate::model::event::EventRow;

/// Select list matching the field order of [`EventRow`].
type EventColumns = (
    mdl_event::id,
    mdl_event::name,
    mdl_event::description,
    mdl_event::timestart,
    mdl_event::timeduration,
    mdl_event::timemodified,
    mdl_event::categoryid,
    mdl_course_categories::name,
    mdl_event::location,
);

pub type EventsForCategory = Order<
    Select<
        Filter<
            InnerJoin<mdl_event::table, mdl_course_categories::table>,
            Eq<mdl_course_categories::id, i64>,
        >,
        EventColumns,
    >,
    mdl_event::id,
>;

/// ## Summary
/// Returns a query for every event of a category together with the category
/// name, ordered by event id.
#[must_use]
pub fn for_category(category_id: i64) -> EventsForCategory {
    mdl_event::table
        .inner_join(mdl_course_categories::table)
        .filter(mdl_course_categories::id.eq(category_id))
        .select((
            mdl_event::id,
            mdl_event::name,
            mdl_event::description,
            mdl_event::timestart,
            mdl_event::timeduration,
            mdl_event::timemodified,
            mdl_event::categoryid,
            mdl_course_categories::name,
            mdl_event::location,
        ))
        .order(mdl_event::id)
}

/// ## Summary
/// Lists every event of a category, ordered by event id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_for_category<C>(conn: &mut C, category_id: i64) -> QueryResult<Vec<EventRow>>
where
    C: AsyncConnection,
    EventsForCategory: LoadQuery<'static, C, EventRow>,
{
    for_category(category_id).load::<EventRow>(conn).await
}
