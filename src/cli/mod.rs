//! Command Line Interface (CLI) layer for hqsubmit.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`). Settings come from flags or the
//! matching `CCHQ_*` environment variables and are handed to the library's
//! `SubmissionPipeline`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
