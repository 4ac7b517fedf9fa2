use thiserror::Error;

use icsfeed_db::error::DbError;
use icsfeed_ical::error::TemplateError;

use crate::feed::writer::WriteError;

/// Failures that abort the rest of a regeneration cycle.
///
/// Files written earlier in the same cycle are kept.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to acquire store connection: {0}")]
    Connect(#[source] DbError),

    #[error("Failed to list categories: {0}")]
    Categories(#[source] DbError),
}

/// Failures confined to one category. The cycle moves on to the next
/// category and the category's previous feed file stays in place.
#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("Failed to list events: {0}")]
    Events(#[source] DbError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

pub type CycleResult<T> = std::result::Result<T, CycleError>;
