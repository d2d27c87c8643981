//! Session derivation
//!
//! Turns one home's ordered event sequence into session rows. Each event
//! becomes a session that runs until one second before the home's next event
//! starts; a home's final event runs to 23:59:59 on its own calendar date.
//!
//! The reported duration for a mid-sequence session is the full gap between
//! consecutive start times, even though the emitted end time stops one second
//! short of the next start. Downstream consumers compare sessions files
//! byte-for-byte, so both sides of that asymmetry are load-bearing and must
//! not be "corrected".

use chrono::{Duration, NaiveDateTime};

use crate::error::SessionError;
use crate::types::{HomeGroup, SessionRow};

/// Deriver computing session rows for a single home group
pub struct SessionDeriver;

impl SessionDeriver {
    /// Derive one session row per event in the group.
    ///
    /// Pure and deterministic: no I/O, no shared state. Duplicate start
    /// times produce a zero-duration row rather than an error.
    pub fn derive(group: &HomeGroup) -> Result<Vec<SessionRow>, SessionError> {
        let mut rows = Vec::with_capacity(group.events.len());

        for (i, current) in group.events.iter().enumerate() {
            let (end_time, duration_secs) = match group.events.get(i + 1) {
                Some(next) => {
                    let raw_gap = next
                        .start_time
                        .signed_duration_since(current.start_time)
                        .num_seconds();
                    let end = offset_secs(current.start_time, raw_gap - 1, &group.home_no)?;
                    (end, raw_gap)
                }
                None => {
                    let end = end_of_day(current.start_time, &group.home_no)?;
                    let gap = end.signed_duration_since(current.start_time).num_seconds();
                    (end, gap + 1)
                }
            };

            rows.push(SessionRow {
                home_no: current.home_no.clone(),
                channel: current.channel.clone(),
                start_time: current.start_time,
                activity: current.activity.clone(),
                end_time,
                duration_secs,
                seq: current.seq,
            });
        }

        Ok(rows)
    }
}

fn offset_secs(
    ts: NaiveDateTime,
    secs: i64,
    home_no: &str,
) -> Result<NaiveDateTime, SessionError> {
    ts.checked_add_signed(Duration::seconds(secs))
        .ok_or_else(|| SessionError::Derive {
            home_no: home_no.to_string(),
            reason: format!("end time overflows when adding {secs}s to {ts}"),
        })
}

fn end_of_day(ts: NaiveDateTime, home_no: &str) -> Result<NaiveDateTime, SessionError> {
    ts.date()
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| SessionError::Derive {
            home_no: home_no.to_string(),
            reason: format!("no end-of-day for {ts}"),
        })
}
