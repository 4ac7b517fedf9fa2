//! Shared types, configuration and errors for the icsfeed workspace.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
