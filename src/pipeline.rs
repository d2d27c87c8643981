//! Pipeline orchestration
//!
//! This module provides the public API for tuneflow. It wires the full run:
//! read statements → parse → group by home → derive sessions on a bounded
//! worker pool → impose the output order → write the sessions file.
//!
//! Home groups are disjoint, so derivation tasks share nothing but the
//! result channel. The channel is the pipeline's only concurrent sink:
//! workers append, the orchestrator drains, and nobody else ever sees it.

use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::info;

use crate::deriver::SessionDeriver;
use crate::error::SessionError;
use crate::grouper::Grouper;
use crate::orderer::OutputOrderer;
use crate::parser;
use crate::types::{HomeGroup, SessionRow};
use crate::writer;

/// Read a statements file and write the derived sessions file.
///
/// One-shot entry point with default configuration. Use [`SessionJob`] to
/// control pool size, timeout, or header handling.
///
/// # Example
/// ```ignore
/// tuneflow::statements_to_sessions(
///     Path::new("input-statements.psv"),
///     Path::new("sessions.psv"),
/// )?;
/// ```
pub fn statements_to_sessions(input: &Path, output: &Path) -> Result<(), SessionError> {
    SessionJob::new().run(input, output)
}

/// Configuration for a session job run
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Upper bound on worker threads; always clamped to the home count
    pub worker_cap: usize,
    /// Single bounded wait for the whole pool to finish
    pub pool_timeout: Duration,
    /// Treat the first input line as a header and skip it
    pub skip_header: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            worker_cap: thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            pool_timeout: Duration::from_secs(5),
            skip_header: false,
        }
    }
}

/// Bounded worker pool deriving sessions for disjoint home groups
pub struct ParallelPipeline {
    worker_cap: usize,
    timeout: Duration,
}

impl ParallelPipeline {
    pub fn new(worker_cap: usize, timeout: Duration) -> Self {
        Self {
            worker_cap,
            timeout,
        }
    }

    /// Run one derivation task per group and collect every row.
    ///
    /// Rows come back in task-completion order; [`OutputOrderer`] owns the
    /// final ordering. The run either yields a row for every input event or
    /// fails as a whole: the first task error aborts it, and a pool that has
    /// not finished by the deadline is a [`SessionError::PoolTimeout`], never
    /// a partial result.
    pub fn run(&self, groups: Vec<HomeGroup>) -> Result<Vec<SessionRow>, SessionError> {
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let expected = groups.len();
        let workers = self.worker_cap.clamp(1, expected);

        // Deal groups round-robin into one bucket per worker.
        let mut buckets: Vec<Vec<HomeGroup>> = (0..workers).map(|_| Vec::new()).collect();
        for (i, group) in groups.into_iter().enumerate() {
            buckets[i % workers].push(group);
        }

        let (tx, rx) = mpsc::channel();
        let mut handles = Vec::with_capacity(workers);
        for bucket in buckets {
            let tx = tx.clone();
            handles.push(thread::spawn(move || {
                for group in bucket {
                    let result = SessionDeriver::derive(&group);
                    // A closed channel means the run already failed; nothing
                    // left to report to.
                    if tx.send(result).is_err() {
                        return;
                    }
                }
            }));
        }
        drop(tx);

        let deadline = Instant::now() + self.timeout;
        let mut rows = Vec::new();
        for _ in 0..expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(Ok(batch)) => rows.extend(batch),
                Ok(Err(e)) => return Err(e),
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    return Err(SessionError::PoolTimeout {
                        timeout_secs: self.timeout.as_secs(),
                    });
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(SessionError::PoolFailure(
                        "worker exited before finishing its groups".to_string(),
                    ));
                }
            }
        }

        for handle in handles {
            if handle.join().is_err() {
                return Err(SessionError::PoolFailure("worker panicked".to_string()));
            }
        }

        Ok(rows)
    }
}

/// End-to-end session job: statements file in, sessions file out.
pub struct SessionJob {
    config: JobConfig,
}

impl Default for SessionJob {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionJob {
    /// Create a job with default configuration
    pub fn new() -> Self {
        Self {
            config: JobConfig::default(),
        }
    }

    /// Create a job with explicit configuration
    pub fn with_config(config: JobConfig) -> Self {
        Self { config }
    }

    /// Run the job.
    ///
    /// All-or-nothing: any failure surfaces as a typed [`SessionError`] and
    /// no output file is created or replaced.
    pub fn run(&self, input: &Path, output: &Path) -> Result<(), SessionError> {
        info!("reading statements from {}", input.display());
        let data = fs::read_to_string(input).map_err(|source| SessionError::InputAccess {
            path: input.to_path_buf(),
            source,
        })?;

        let events = parser::parse_statements(&data, self.config.skip_header)?;
        let event_count = events.len();
        let groups = Grouper::group(events);
        info!(
            "deriving sessions for {} events across {} homes",
            event_count,
            groups.len()
        );

        let pipeline = ParallelPipeline::new(self.config.worker_cap, self.config.pool_timeout);
        let rows = pipeline.run(groups)?;
        let ordered = OutputOrderer::order(rows);

        writer::write_sessions(output, &ordered)?;
        info!("wrote {} session rows to {}", ordered.len(), output.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INTERLEAVED: &str = "\
H2|C2|20240101100100|Live
H1|C1|20240101100000|Live
H1|C3|20240101100100|Playback
H2|C4|20240101235959|Live
";

    const INTERLEAVED_EXPECTED: &str = "\
HomeNo|Channel|Starttime|Activity|EndTime|Duration
H1|C1|20240101100000|Live|20240101100059|60
H1|C3|20240101100100|Playback|20240101235959|50340
H2|C2|20240101100100|Live|20240101235958|50339
H2|C4|20240101235959|Live|20240101235959|1
";

    fn run_job(input: &str, config: JobConfig) -> Result<String, SessionError> {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("statements.psv");
        let output_path = dir.path().join("sessions.psv");
        fs::write(&input_path, input).unwrap();

        SessionJob::with_config(config).run(&input_path, &output_path)?;
        Ok(fs::read_to_string(&output_path).unwrap())
    }

    #[test]
    fn test_end_to_end_interleaved_homes() {
        let output = run_job(INTERLEAVED, JobConfig::default()).unwrap();
        assert_eq!(output, INTERLEAVED_EXPECTED);
    }

    #[test]
    fn test_output_is_deterministic_across_runs_and_pool_sizes() {
        let first = run_job(INTERLEAVED, JobConfig::default()).unwrap();
        let second = run_job(INTERLEAVED, JobConfig::default()).unwrap();
        assert_eq!(first, second);

        for cap in [1, 2, 8] {
            let config = JobConfig {
                worker_cap: cap,
                ..JobConfig::default()
            };
            assert_eq!(run_job(INTERLEAVED, config).unwrap(), first);
        }
    }

    #[test]
    fn test_cardinality_one_row_per_event() {
        let output = run_job(INTERLEAVED, JobConfig::default()).unwrap();
        // Header plus one row per input line.
        assert_eq!(output.lines().count(), 1 + INTERLEAVED.lines().count());
    }

    #[test]
    fn test_homes_do_not_influence_each_other() {
        let combined = run_job(INTERLEAVED, JobConfig::default()).unwrap();
        let h1_alone = run_job(
            "H1|C1|20240101100000|Live\nH1|C3|20240101100100|Playback\n",
            JobConfig::default(),
        )
        .unwrap();

        let combined_h1: Vec<&str> = combined
            .lines()
            .filter(|l| l.starts_with("H1|"))
            .collect();
        let alone_h1: Vec<&str> = h1_alone
            .lines()
            .filter(|l| l.starts_with("H1|"))
            .collect();
        assert_eq!(combined_h1, alone_h1);
    }

    #[test]
    fn test_malformed_input_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("statements.psv");
        let output_path = dir.path().join("sessions.psv");
        fs::write(
            &input_path,
            "H1|C1|20240101100000|Live\nH1|C1|not-a-timestamp|Live\n",
        )
        .unwrap();

        let err = SessionJob::new().run(&input_path, &output_path).unwrap_err();
        assert!(matches!(err, SessionError::MalformedRecord { line: 2, .. }));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionJob::new()
            .run(&dir.path().join("absent.psv"), &dir.path().join("out.psv"))
            .unwrap_err();
        assert!(matches!(err, SessionError::InputAccess { .. }));
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let output = run_job("", JobConfig::default()).unwrap();
        assert_eq!(output, "HomeNo|Channel|Starttime|Activity|EndTime|Duration\n");
    }

    #[test]
    fn test_pool_handles_more_homes_than_workers() {
        let mut input = String::new();
        for i in 0..20 {
            input.push_str(&format!("H{i:02}|C1|20240101100000|Live\n"));
        }
        let config = JobConfig {
            worker_cap: 3,
            ..JobConfig::default()
        };

        let output = run_job(&input, config).unwrap();
        assert_eq!(output.lines().count(), 21);
    }

    #[test]
    fn test_parallel_pipeline_empty_groups() {
        let pipeline = ParallelPipeline::new(4, Duration::from_secs(5));
        assert!(pipeline.run(Vec::new()).unwrap().is_empty());
    }
}
