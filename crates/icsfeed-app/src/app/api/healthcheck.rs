//! Liveness check.

use icsfeed_core::constants::HEALTHCHECK_ROUTE_COMPONENT;
use salvo::{Router, handler};

/// Answers `OK` while the process is up. The store is not consulted, so a
/// database outage does not fail the check.
#[handler]
async fn alive() -> &'static str {
    "OK"
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(HEALTHCHECK_ROUTE_COMPONENT).get(alive)
}
