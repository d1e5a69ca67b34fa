use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("{0}")]
    Submit(#[from] hqsubmit::Error),

    #[error("Cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}
