//! Read-only access to the generated feed files.

use std::path::Path;

use salvo::Router;
use salvo::serve_static::StaticDir;

/// ## Summary
/// Serves the files of `destination` by name, e.g. `GET /5.ics`.
///
/// Hidden files, including scratch files of writes in progress, are not
/// served and directories are not listed.
#[must_use]
pub fn routes(destination: &Path) -> Router {
    Router::with_path("{*path}").get(
        StaticDir::new([destination.to_path_buf()])
            .include_dot_files(false)
            .auto_list(false),
    )
}
