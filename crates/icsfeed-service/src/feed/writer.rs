//! Whole-file replacement of feed documents.

use std::io;
use std::path::{Path, PathBuf};

use icsfeed_core::constants::TEMP_FILE_SUFFIX;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// A feed file could not be written.
#[derive(Error, Debug)]
#[error("Failed to write feed {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// ## Summary
/// Writes `contents` to `path`, replacing any previous file.
///
/// The bytes go to a hidden sibling file first, which is then renamed over
/// the target, so readers see either the old or the new document in full.
///
/// ## Errors
/// Returns `WriteError` if writing or renaming fails. The target is left as
/// it was and the scratch file is removed.
#[tracing::instrument(skip(path, contents), fields(path = %path.display(), bytes = contents.len()))]
pub async fn write_feed(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let scratch = scratch_path(path);

    if let Err(source) = replace(&scratch, path, contents).await {
        match tokio::fs::remove_file(&scratch).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %scratch.display(), error = %e, "Failed to remove scratch file");
            }
        }
        return Err(WriteError {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::debug!("Feed written");

    Ok(())
}

/// `<dir>/<name>` becomes `<dir>/.<name>.tmp`.
fn scratch_path(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{name}.{TEMP_FILE_SUFFIX}"))
}

async fn replace(scratch: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::File::create(scratch).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(scratch, path).await
}
