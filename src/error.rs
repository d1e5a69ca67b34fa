//! Crate-level error type and `Result` alias for stable, structured error handling.
//! One variant per failure kind of the submission flow: configuration, input rows,
//! template loading and rendering, transport, and the remote service's verdict.
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::SubmissionOutcome;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required configuration: {}", missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("Invalid input at row {row}: {message}")]
    Input { row: usize, message: String },

    #[error("Missing required field `{field}` at row {row}")]
    MissingField { field: &'static str, row: usize },

    #[error("Cannot load template {}: {reason}", path.display())]
    TemplateLoad { path: PathBuf, reason: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}s", after.as_secs_f64())]
    NetworkTimeout { after: Duration },

    #[error("{reason}")]
    RemoteRejection { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    RemoteFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Collapse a terminal error into the `(success, message)` contract of a
    /// submission attempt. Remote verdicts keep their message verbatim.
    pub fn outcome(&self) -> SubmissionOutcome {
        SubmissionOutcome::failure(self.to_string())
    }

    /// True for errors raised before anything was sent to the remote service.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::Input { .. }
                | Error::MissingField { .. }
                | Error::TemplateLoad { .. }
                | Error::Render(_)
                | Error::Io(_)
                | Error::Csv(_)
        )
    }
}
