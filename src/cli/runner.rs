use std::path::Path;
use std::process::ExitCode;

use clap::CommandFactory;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hqsubmit::{Error, RawSettings, SubmissionOutcome, SubmissionPipeline, SubmitMode};

use super::args::CliArgs;
use super::errors::AppError;

// `try_init` so a second call in the same process is a no-op.
fn init_logging(enabled: bool) {
    if enabled {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    }
}

fn raw_settings(args: &CliArgs) -> RawSettings {
    RawSettings {
        base_url: Some(args.base_url.clone()),
        project_space: args.project_space.clone(),
        case_type: args.case_type.clone(),
        owner_id: args.owner_id.clone(),
        xmlns: args.xmlns.clone(),
        device_id: Some(args.device_id.clone()),
        username: args.username.clone(),
        password: args.password.clone(),
        user_id: args.user_id.clone(),
        template_path: Some(args.template.clone()),
        timeout_secs: Some(args.timeout_secs),
    }
}

fn print_outcome(outcome: &SubmissionOutcome, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        println!("{}", outcome.message);
    }
    Ok(())
}

/// Returns whether every submission succeeded.
fn submit_file(args: &CliArgs, csv: &Path) -> Result<bool, AppError> {
    let settings = raw_settings(args).validate()?;
    debug!("Settings: {:?}", settings);

    if !csv.is_file() {
        return Err(AppError::InputNotFound {
            path: csv.to_path_buf(),
        });
    }

    let mode = if args.per_record {
        SubmitMode::PerRecord
    } else {
        SubmitMode::Batch
    };

    let pipeline = SubmissionPipeline::from_settings(settings)?;
    info!("Receiver: {}", pipeline.receiver_url());

    if args.dry_run {
        for form in pipeline.dry_run(csv, mode)? {
            info!("Rendered form {}", form.submission_id);
            println!("{}", form.xml);
        }
        return Ok(true);
    }

    let report = pipeline.run(csv, mode)?;
    for outcome in &report.outcomes {
        print_outcome(outcome, args.json)?;
    }
    info!(
        "{} case(s) in {} form(s): {} succeeded, {} failed",
        report.cases,
        report.outcomes.len(),
        report.succeeded(),
        report.failed()
    );
    Ok(report.success())
}

fn report_error(err: &AppError, json: bool) {
    match err {
        AppError::Submit(Error::Configuration { missing }) => {
            eprintln!("Missing required configuration:");
            for name in missing {
                eprintln!("  {name}");
            }
        }
        AppError::Submit(e) if json => {
            if let Ok(line) = serde_json::to_string(&e.outcome()) {
                println!("{line}");
            }
        }
        other => eprintln!("{other}"),
    }
}

/// The CSV path when exactly one was given.
fn single_input(args: &CliArgs) -> Option<&Path> {
    match args.csv.as_slice() {
        [csv] => Some(csv.as_path()),
        _ => None,
    }
}

pub fn run(args: CliArgs) -> ExitCode {
    init_logging(args.log);

    let Some(csv) = single_input(&args) else {
        // Wrong invocation: show usage, not an error status.
        let _ = CliArgs::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    match submit_file(&args, csv) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            report_error(&err, args.json);
            ExitCode::FAILURE
        }
    }
}
