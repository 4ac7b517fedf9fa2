mod feeds;
mod healthcheck;

use std::path::Path;

use salvo::Router;
use salvo::logging::Logger;

/// ## Summary
/// Constructs the publisher router: the health check plus every file of the
/// output directory.
#[must_use]
pub fn routes(destination: &Path) -> Router {
    Router::new()
        .hoop(Logger::new())
        .push(healthcheck::routes())
        .push(feeds::routes(destination))
}
