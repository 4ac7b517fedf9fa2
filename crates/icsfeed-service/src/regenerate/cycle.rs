//! One regeneration cycle.

use std::path::PathBuf;

use icsfeed_core::config::FeedConfig;
use icsfeed_core::types::Category;
use icsfeed_db::db::{EventStore, StoreProvider};
use icsfeed_ical::ical::{CalendarEntry, EntryTemplate, FeedEnvelope, Field, format_event};

use crate::error::{CategoryError, CycleError, CycleResult};
use crate::feed::writer::write_feed;

/// Outcome of a cycle that ran to the end.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Categories whose feed was replaced, in processing order.
    pub written: Vec<i64>,
    /// Categories skipped this cycle. Their previous feed file is untouched.
    pub failed: Vec<(i64, CategoryError)>,
}

impl CycleReport {
    /// ## Summary
    /// Returns whether every category was written.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// ## Summary
/// Regenerates the feed of every category that has events.
///
/// The template is loaded and a store handle is acquired once, at the start;
/// the handle is released when the cycle returns, whatever the outcome.
/// Categories are processed sequentially in the order the store lists them.
///
/// ## Errors
/// Returns a `CycleError` if the template cannot be loaded or rendered, no
/// store connection can be acquired, or the categories query fails. Files
/// written earlier in the cycle are kept. Failures confined to one category
/// are recorded in the report instead.
#[tracing::instrument(skip_all, fields(destination = %config.destination.display()))]
pub async fn run_cycle<P: StoreProvider>(provider: &P, config: &FeedConfig) -> CycleResult<CycleReport> {
    let template = EntryTemplate::load(&config.template).await?;
    if !template.references(Field::Uid) {
        tracing::warn!("Template has no uid placeholder; clients cannot de-duplicate entries");
    }
    let envelope = FeedEnvelope::new(&config.product_id);

    let mut store = provider.acquire().await.map_err(CycleError::Connect)?;

    let categories = store
        .list_categories_with_events()
        .await
        .map_err(CycleError::Categories)?;

    tracing::debug!(count = categories.len(), "Regenerating categories");

    let mut report = CycleReport::default();

    for category in &categories {
        match regenerate_category(&mut store, category, &template, &envelope, config).await? {
            Ok(_) => report.written.push(category.id),
            Err(error) => {
                tracing::warn!(
                    category_id = category.id,
                    error = %error,
                    "Category skipped, previous feed left in place"
                );
                report.failed.push((category.id, error));
            }
        }
    }

    Ok(report)
}

/// The outer result carries cycle-fatal failures, the inner one failures
/// confined to this category.
#[tracing::instrument(skip_all, fields(category_id = category.id, category_name = %category.name))]
async fn regenerate_category<S: EventStore>(
    store: &mut S,
    category: &Category,
    template: &EntryTemplate,
    envelope: &FeedEnvelope,
    config: &FeedConfig,
) -> CycleResult<Result<PathBuf, CategoryError>> {
    let events = match store.list_events_for_category(category.id).await {
        Ok(events) => events,
        Err(error) => return Ok(Err(CategoryError::Events(error))),
    };

    let entries: Vec<CalendarEntry> = events.iter().map(format_event).collect();
    let document = envelope.render_entries(template, &entries)?;

    tracing::debug!(event_count = entries.len(), "Feed rendered");

    let path = config.feed_path(category.id);

    Ok(write_feed(&path, document.as_bytes())
        .await
        .map(|()| path)
        .map_err(CategoryError::from))
}
