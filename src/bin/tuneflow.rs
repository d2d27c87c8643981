//! Tuneflow CLI - derive a sessions file from a statements file
//!
//! Usage: `tuneflow <input-statements-file> <output-sessions-file>`
//!
//! Failures print a single JSON error object to stderr and exit non-zero;
//! no output file is left behind on failure.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tuneflow::{JobConfig, SessionError, SessionJob, TUNEFLOW_VERSION};

/// Tuneflow - Batch compute engine for TV tuning-event sessions
#[derive(Parser)]
#[command(name = "tuneflow")]
#[command(version = TUNEFLOW_VERSION)]
#[command(about = "Derive viewing sessions from a tuning-event log", long_about = None)]
struct Cli {
    /// Input statements file (pipe-delimited: HomeNo|Channel|Starttime|Activity)
    input: PathBuf,

    /// Output sessions file
    output: PathBuf,

    /// Treat the first input line as a header and skip it
    #[arg(long)]
    skip_header: bool,

    /// Worker-pool size cap (defaults to the CPU count)
    #[arg(long)]
    workers: Option<usize>,

    /// Bounded wait for the worker pool, in seconds
    #[arg(long, default_value = "5")]
    timeout_secs: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SessionError> {
    let mut config = JobConfig {
        pool_timeout: Duration::from_secs(cli.timeout_secs),
        skip_header: cli.skip_header,
        ..JobConfig::default()
    };
    if let Some(workers) = cli.workers {
        config.worker_cap = workers;
    }

    SessionJob::with_config(config).run(&cli.input, &cli.output)
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        let (code, hint) = match &e {
            SessionError::InputAccess { .. } => (
                "INPUT_ERROR",
                "Check that the input statements file exists and is readable",
            ),
            SessionError::MalformedRecord { .. } => (
                "MALFORMED_RECORD",
                "Each line must be HomeNo|Channel|Starttime|Activity with Starttime as yyyyMMddHHmmss",
            ),
            SessionError::Derive { .. } => (
                "DERIVE_ERROR",
                "Check the start times recorded for the named home",
            ),
            SessionError::PoolTimeout { .. } => (
                "POOL_TIMEOUT",
                "Raise --timeout-secs or reduce the input size",
            ),
            SessionError::PoolFailure(_) => ("POOL_FAILURE", "Re-run the job"),
            SessionError::OutputAccess { .. } => (
                "OUTPUT_ERROR",
                "Check that the output directory exists and is writable",
            ),
        };

        CliError {
            code: code.to_string(),
            message: e.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}
