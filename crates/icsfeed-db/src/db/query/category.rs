//! Query composition for categories.

use diesel::dsl::{Distinct, InnerJoin, Order, Select};
use diesel::prelude::*;
use diesel_async::methods::LoadQuery;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::schema::{mdl_course_categories, mdl_event};
use crate::model::category::CategoryRow;

pub type CategoriesWithEvents = Order<
    Distinct<
        Select<
            InnerJoin<mdl_course_categories::table, mdl_event::table>,
            (mdl_course_categories::id, mdl_course_categories::name),
        >,
    >,
    mdl_course_categories::id,
>;

/// ## Summary
/// Returns a query for the distinct categories that have at least one
/// event, ordered by id.
#[must_use]
pub fn with_events() -> CategoriesWithEvents {
    mdl_course_categories::table
        .inner_join(mdl_event::table)
        .select((mdl_course_categories::id, mdl_course_categories::name))
        .distinct()
        .order(mdl_course_categories::id)
}

/// ## Summary
/// Lists the distinct categories that have at least one event, ordered by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_with_events<C>(conn: &mut C) -> QueryResult<Vec<CategoryRow>>
where
    C: AsyncConnection,
    CategoriesWithEvents: LoadQuery<'static, C, CategoryRow>,
{
    with_events().load::<CategoryRow>(conn).await
}
