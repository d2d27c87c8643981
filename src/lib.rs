//! Tuneflow - Batch compute engine for TV tuning-event sessions
//!
//! Tuneflow transforms a pipe-delimited log of tuning events (one
//! household/device event per line) into a derived sessions file through a
//! deterministic pipeline: parsing → per-home grouping → parallel session
//! derivation → output ordering → writing.
//!
//! Each event becomes one session row spanning from its start time to one
//! second before the home's next event (or to end-of-day for a home's last
//! event), annotated with a duration in seconds. Derivation runs one task
//! per home on a bounded worker pool; the output order is imposed once,
//! after collection, so results are byte-identical regardless of scheduling.

pub mod deriver;
pub mod error;
pub mod grouper;
pub mod orderer;
pub mod parser;
pub mod pipeline;
pub mod types;
pub mod writer;

pub use deriver::SessionDeriver;
pub use error::SessionError;
pub use grouper::Grouper;
pub use orderer::OutputOrderer;
pub use pipeline::{statements_to_sessions, JobConfig, ParallelPipeline, SessionJob};
pub use types::{HomeGroup, SessionRow, TuneEvent, TIMESTAMP_FORMAT};
pub use writer::OUTPUT_HEADER;

/// Tuneflow version reported by the CLI
pub const TUNEFLOW_VERSION: &str = env!("CARGO_PKG_VERSION");
