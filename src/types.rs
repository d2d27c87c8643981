//! Core types for the tuneflow pipeline
//!
//! This module defines the data that flows through each stage of the
//! pipeline: tuning events read from the statements file, per-home groups,
//! and the derived session rows written to the output file.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Fixed timestamp format shared by input and output files (`yyyyMMddHHmmss`)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A single tuning event from the input statements file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuneEvent {
    /// Household/device identifier (the grouping key)
    pub home_no: String,
    /// Channel the device tuned to
    pub channel: String,
    /// Event start time (second precision, no timezone)
    pub start_time: NaiveDateTime,
    /// Activity code reported with the event
    pub activity: String,
    /// Zero-based position of the source line in the input
    pub seq: usize,
}

/// One home's events, ascending by start time
///
/// Groups are disjoint by construction, so derivation tasks can run in
/// parallel without sharing any mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeGroup {
    /// Home identifier shared by every event in the group
    pub home_no: String,
    /// Events sorted ascending by start time, input order on ties
    pub events: Vec<TuneEvent>,
}

/// A derived viewing session; exactly one per input event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRow {
    pub home_no: String,
    pub channel: String,
    pub start_time: NaiveDateTime,
    pub activity: String,
    /// Last second covered by the session
    pub end_time: NaiveDateTime,
    /// Reported duration in seconds
    pub duration_secs: i64,
    /// Source event position; keeps the output sort total, never emitted
    #[serde(skip)]
    pub seq: usize,
}

impl SessionRow {
    /// Render the row in the output file's pipe-delimited format
    pub fn to_psv_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.home_no,
            self.channel,
            self.start_time.format(TIMESTAMP_FORMAT),
            self.activity,
            self.end_time.format(TIMESTAMP_FORMAT),
            self.duration_secs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_psv_line_format() {
        let row = SessionRow {
            home_no: "H100".to_string(),
            channel: "C5".to_string(),
            start_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            activity: "Live".to_string(),
            end_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 59)
                .unwrap(),
            duration_secs: 60,
            seq: 0,
        };

        assert_eq!(row.to_psv_line(), "H100|C5|20240101100000|Live|20240101100059|60");
    }
}
