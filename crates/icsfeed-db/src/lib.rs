//! Read-only access to the event store.

pub mod db;
pub mod error;
pub mod model;
