//! Sessions-file output
//!
//! Persists ordered session rows as pipe-delimited text under a fixed
//! header. The write is all-or-nothing: the body is rendered in full, written
//! to a temporary sibling, then renamed into place, so a failed run never
//! leaves a truncated sessions file behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SessionError;
use crate::types::SessionRow;

/// Fixed header line of the output sessions file
pub const OUTPUT_HEADER: &str = "HomeNo|Channel|Starttime|Activity|EndTime|Duration";

/// Write the ordered rows to `path`.
pub fn write_sessions(path: &Path, rows: &[SessionRow]) -> Result<(), SessionError> {
    let mut body = String::with_capacity((rows.len() + 1) * 48);
    body.push_str(OUTPUT_HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(&row.to_psv_line());
        body.push('\n');
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, body).map_err(|source| SessionError::OutputAccess {
        path: path.to_path_buf(),
        source,
    })?;

    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        SessionError::OutputAccess {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
