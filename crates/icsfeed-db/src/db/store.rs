//! The two read queries a regeneration cycle issues, behind a trait.
//!
//! A cycle acquires one [`EventStore`] from a [`StoreProvider`], uses it for
//! every query of the cycle and drops it at the end, which releases the
//! underlying connection on every exit path.

use std::future::Future;

use icsfeed_core::types::{Category, Event};

use crate::db::connection::{MysqlPooledConnection, PgPooledConnection};
use crate::db::query::{category, event};
use crate::error::DbResult;
use crate::model::category::CategoryRow;
use crate::model::event::EventRow;

/// A live, exclusively owned handle on the event store.
pub trait EventStore: Send {
    /// ## Summary
    /// Lists the distinct categories with at least one event.
    ///
    /// ## Errors
    /// Returns an error on connection loss or query failure.
    fn list_categories_with_events(
        &mut self,
    ) -> impl Future<Output = DbResult<Vec<Category>>> + Send;

    /// ## Summary
    /// Lists every event whose category is `category_id`.
    ///
    /// ## Errors
    /// Returns an error on connection loss or query failure.
    fn list_events_for_category(
        &mut self,
        category_id: i64,
    ) -> impl Future<Output = DbResult<Vec<Event>>> + Send;
}

/// Hands out [`EventStore`] handles, one per cycle.
pub trait StoreProvider: Send + Sync {
    type Store: EventStore + 'static;

    /// ## Summary
    /// Acquires a store handle. Dropping the handle releases it.
    ///
    /// ## Errors
    /// Returns an error if no connection can be obtained.
    fn acquire(&self) -> impl Future<Output = DbResult<Self::Store>> + Send;
}

/// [`EventStore`] over a pooled `PostgreSQL` connection.
pub struct PgEventStore {
    conn: PgPooledConnection<'static>,
}

impl PgEventStore {
    #[must_use]
    pub const fn new(conn: PgPooledConnection<'static>) -> Self {
        Self { conn }
    }
}

impl EventStore for PgEventStore {
    #[tracing::instrument(skip(self))]
    async fn list_categories_with_events(&mut self) -> DbResult<Vec<Category>> {
        let rows = category::list_with_events(&mut *self.conn).await?;
        Ok(categories(rows))
    }

    #[tracing::instrument(skip(self))]
    async fn list_events_for_category(&mut self, category_id: i64) -> DbResult<Vec<Event>> {
        let rows = event::list_for_category(&mut *self.conn, category_id).await?;
        Ok(events(rows))
    }
}

/// [`EventStore`] over a pooled `MySQL` connection, as used by Moodle
/// installations.
pub struct MysqlEventStore {
    conn: MysqlPooledConnection<'static>,
}

impl MysqlEventStore {
    #[must_use]
    pub const fn new(conn: MysqlPooledConnection<'static>) -> Self {
        Self { conn }
    }
}

impl EventStore for MysqlEventStore {
    #[tracing::instrument(skip(self))]
    async fn list_categories_with_events(&mut self) -> DbResult<Vec<Category>> {
        let rows = category::list_with_events(&mut *self.conn).await?;
        Ok(categories(rows))
    }

    #[tracing::instrument(skip(self))]
    async fn list_events_for_category(&mut self, category_id: i64) -> DbResult<Vec<Event>> {
        let rows = event::list_for_category(&mut *self.conn, category_id).await?;
        Ok(events(rows))
    }
}

fn categories(rows: Vec<CategoryRow>) -> Vec<Category> {
    tracing::debug!(count = rows.len(), "Categories with events loaded");

    rows.into_iter().map(Category::from).collect()
}

fn events(rows: Vec<EventRow>) -> Vec<Event> {
    tracing::debug!(count = rows.len(), "Events loaded");

    rows.into_iter().map(Event::from).collect()
}
