use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or applying an entry template
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Template render error: {0}")]
    Render(#[from] std::fmt::Error),
}

pub type TemplateResult<T> = std::result::Result<T, TemplateError>;
