//! Tracing subscriber setup.

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Handle for swapping the active log filter after startup.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// ## Summary
/// Installs the global subscriber with a `debug` filter and returns a handle
/// to replace that filter once configuration is known.
#[must_use]
pub fn init() -> FilterHandle {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    filter_handle
}

/// ## Summary
/// Switches the filter to `level`. An invalid directive keeps the current
/// filter and logs a warning.
pub fn apply_level(handle: &FilterHandle, level: &str) {
    if let Ok(filter) = EnvFilter::try_new(level) {
        if let Err(e) = handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %level, "Invalid log level in config, keeping debug");
    }
}
