//! hqsubmit CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: load `.env`, parse args,
//! run the submission and exit with the matching status.
//! For programmatic use, prefer the library API (`hqsubmit::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    // A missing .env file is fine; settings may come from flags or the environment.
    dotenvy::dotenv().ok();
    let args = cli::CliArgs::parse();
    cli::run(args)
}
