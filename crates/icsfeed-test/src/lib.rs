//! In-memory event store for exercising regeneration without a database.
//!
//! [`MemoryProvider`] implements the same store traits as the pooled
//! `PostgreSQL` and `MySQL` providers. Failures can be injected per query and a cycle can
//! be held inside its categories query to observe the scheduler while a
//! cycle is running.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use icsfeed_core::types::{Category, Event};
use icsfeed_db::db::{EventStore, StoreProvider};
use icsfeed_db::error::{DbError, DbResult};
use tokio::sync::{Notify, Semaphore};

pub use icsfeed_app;
pub use icsfeed_core;
pub use icsfeed_db;
pub use icsfeed_ical;
pub use icsfeed_service;

#[derive(Debug, Default)]
struct MemoryState {
    categories: Vec<Category>,
    events: BTreeMap<i64, Vec<Event>>,
    failing_categories: HashSet<i64>,
    fail_category_listing: bool,
    fail_acquire: bool,
    acquired: usize,
    released: usize,
}

/// Locks the shared state and recovers from poisoning.
fn lock_state(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            state.clear_poison();
            poisoned.into_inner()
        }
    }
}

fn outage(what: &str) -> DbError {
    DbError::DatabaseError(diesel::result::Error::QueryBuilderError(
        format!("simulated outage: {what}").into(),
    ))
}

/// Holds a cycle inside its categories query until resumed.
#[derive(Debug, Clone)]
pub struct PausePoint {
    reached: Arc<Notify>,
    resume: Arc<Semaphore>,
}

impl PausePoint {
    fn new() -> Self {
        Self {
            reached: Arc::new(Notify::new()),
            resume: Arc::new(Semaphore::new(0)),
        }
    }

    /// ## Summary
    /// Resolves once a cycle is blocked at the pause point.
    pub async fn wait_until_reached(&self) {
        self.reached.notified().await;
    }

    /// ## Summary
    /// Lets the blocked cycle, and every later one, through.
    pub fn resume(&self) {
        self.resume.add_permits(1);
    }

    async fn block(&self) {
        self.reached.notify_one();
        // The permit goes back on drop, so the point stays open once resumed.
        let _permit = self.resume.acquire().await;
    }
}

/// Shared in-memory store contents.
///
/// Clones share state, so a test keeps one clone to inspect and mutate while
/// the regenerator owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    state: Arc<Mutex<MemoryState>>,
    pause: Option<PausePoint>,
}

impl MemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Adds an event. Its category is listed from then on, in first-seen
    /// order.
    #[must_use]
    pub fn with_event(self, event: Event) -> Self {
        self.insert_event(event);
        self
    }

    /// ## Summary
    /// Adds an event to a provider that is already in use.
    pub fn insert_event(&self, event: Event) {
        let mut state = lock_state(&self.state);

        if !state.categories.iter().any(|c| c.id == event.category_id) {
            state.categories.push(Category {
                id: event.category_id,
                name: event.category_name.clone(),
            });
        }
        state.events.entry(event.category_id).or_default().push(event);
    }

    /// ## Summary
    /// Makes the events query fail for `category_id`.
    pub fn fail_events_for(&self, category_id: i64) {
        lock_state(&self.state).failing_categories.insert(category_id);
    }

    /// ## Summary
    /// Makes the categories query fail.
    pub fn fail_category_listing(&self) {
        lock_state(&self.state).fail_category_listing = true;
    }

    /// ## Summary
    /// Makes acquiring a store handle fail.
    pub fn fail_acquire(&self) {
        lock_state(&self.state).fail_acquire = true;
    }

    /// ## Summary
    /// Clears every injected failure.
    pub fn heal(&self) {
        let mut state = lock_state(&self.state);
        state.failing_categories.clear();
        state.fail_category_listing = false;
        state.fail_acquire = false;
    }

    /// ## Summary
    /// Installs a pause point hit by every cycle's categories query.
    #[must_use]
    pub fn paused(mut self) -> (Self, PausePoint) {
        let pause = PausePoint::new();
        self.pause = Some(pause.clone());
        (self, pause)
    }

    /// Handles successfully acquired so far.
    #[must_use]
    pub fn acquired(&self) -> usize {
        lock_state(&self.state).acquired
    }

    /// Handles dropped so far.
    #[must_use]
    pub fn released(&self) -> usize {
        lock_state(&self.state).released
    }
}

impl StoreProvider for MemoryProvider {
    type Store = MemoryStore;

    async fn acquire(&self) -> DbResult<MemoryStore> {
        let mut state = lock_state(&self.state);
        if state.fail_acquire {
            return Err(outage("acquire"));
        }
        state.acquired += 1;

        Ok(MemoryStore {
            state: Arc::clone(&self.state),
            pause: self.pause.clone(),
        })
    }
}

/// A handle on a [`MemoryProvider`]. Counts itself released when dropped.
#[derive(Debug)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    pause: Option<PausePoint>,
}

impl EventStore for MemoryStore {
    async fn list_categories_with_events(&mut self) -> DbResult<Vec<Category>> {
        if let Some(pause) = &self.pause {
            pause.block().await;
        }

        let state = lock_state(&self.state);
        if state.fail_category_listing {
            return Err(outage("categories"));
        }
        Ok(state.categories.clone())
    }

    async fn list_events_for_category(&mut self, category_id: i64) -> DbResult<Vec<Event>> {
        let state = lock_state(&self.state);
        if state.failing_categories.contains(&category_id) {
            return Err(outage("events"));
        }
        Ok(state.events.get(&category_id).cloned().unwrap_or_default())
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        lock_state(&self.state).released += 1;
    }
}

/// ## Summary
/// Builds an event with a generated name and empty optional fields.
#[must_use]
pub fn event(id: i64, category_id: i64, start_epoch: i64, duration_seconds: i64) -> Event {
    Event {
        id,
        name: format!("Event {id}"),
        description_html: String::new(),
        start_epoch,
        duration_seconds,
        modified_epoch: start_epoch,
        category_id,
        category_name: format!("Category {category_id}"),
        location: String::new(),
    }
}
