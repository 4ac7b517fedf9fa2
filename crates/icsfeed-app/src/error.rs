use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Output directory {} is unusable: {source}", path.display())]
    DestinationError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type AppResult<T> = std::result::Result<T, AppError>;
