//! Process bootstrap and the feed publisher.

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
