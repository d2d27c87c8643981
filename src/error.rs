//! Error types for tuneflow

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing a sessions file
///
/// Every variant is fatal for the whole run: the pipeline never skips a bad
/// record or hands a partial result to the writer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot read input file {}: {}", .path.display(), .source)]
    InputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("session derivation failed for home {home_no}: {reason}")]
    Derive { home_no: String, reason: String },

    #[error("worker pool did not finish within {timeout_secs}s")]
    PoolTimeout { timeout_secs: u64 },

    #[error("worker pool failed: {0}")]
    PoolFailure(String),

    #[error("cannot write output file {}: {}", .path.display(), .source)]
    OutputAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
