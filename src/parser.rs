//! Statement-line parsing
//!
//! Tokenizes the pipe-delimited statements file into [`TuneEvent`]s. Field
//! layout is `HomeNo|Channel|Starttime|Activity` with `Starttime` in the
//! fixed `yyyyMMddHHmmss` format. Any line that does not tokenize, or whose
//! start time does not parse, fails the whole run.

use chrono::NaiveDateTime;

use crate::error::SessionError;
use crate::types::{TuneEvent, TIMESTAMP_FORMAT};

/// Parse the full statements file body into events.
///
/// `skip_header` drops the first line before parsing; some feeds carry a
/// header line and some do not, so it is a caller choice. Line numbers in
/// errors are 1-based positions in the file either way.
pub fn parse_statements(input: &str, skip_header: bool) -> Result<Vec<TuneEvent>, SessionError> {
    let mut events = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        if skip_header && idx == 0 {
            continue;
        }
        events.push(parse_line(line, idx + 1, events.len())?);
    }

    Ok(events)
}

/// Parse one statement line.
///
/// Fields beyond the fourth are ignored; fewer than four is an error.
pub fn parse_line(line: &str, line_no: usize, seq: usize) -> Result<TuneEvent, SessionError> {
    let mut fields = line.split('|');

    let home_no = next_field(&mut fields, line_no, "HomeNo")?;
    let channel = next_field(&mut fields, line_no, "Channel")?;
    let start_raw = next_field(&mut fields, line_no, "Starttime")?;
    let activity = next_field(&mut fields, line_no, "Activity")?;

    let start_time = NaiveDateTime::parse_from_str(start_raw, TIMESTAMP_FORMAT).map_err(|e| {
        SessionError::MalformedRecord {
            line: line_no,
            reason: format!("invalid Starttime {start_raw:?}: {e}"),
        }
    })?;

    Ok(TuneEvent {
        home_no: home_no.to_string(),
        channel: channel.to_string(),
        start_time,
        activity: activity.to_string(),
        seq,
    })
}

fn next_field<'a>(
    fields: &mut std::str::Split<'a, char>,
    line_no: usize,
    name: &str,
) -> Result<&'a str, SessionError> {
    fields.next().ok_or_else(|| SessionError::MalformedRecord {
        line: line_no,
        reason: format!("missing {name} field (expected HomeNo|Channel|Starttime|Activity)"),
    })
}
