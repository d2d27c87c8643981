//! Output ordering
//!
//! Imposes the one authoritative order on rows collected from the worker
//! pool. Rows arrive in whatever order tasks finished; everything downstream
//! of this module sees `(home_no, start_time)` ascending.
//!
//! The sort reads the structured row fields, never re-parsed output lines;
//! a sort keyed on re-split strings silently breaks the moment a field
//! contains the delimiter or the split is done wrong.

use crate::types::SessionRow;

/// Orderer producing the final output sequence
pub struct OutputOrderer;

impl OutputOrderer {
    /// Sort rows ascending by `(home_no, start_time)`.
    ///
    /// `(home_no, start_time)` identifies a row for well-formed input;
    /// duplicate pairs fall back to the source event position so the order
    /// stays total no matter which worker finished first.
    pub fn order(mut rows: Vec<SessionRow>) -> Vec<SessionRow> {
        rows.sort_by(|a, b| {
            a.home_no
                .cmp(&b.home_no)
                .then_with(|| a.start_time.cmp(&b.start_time))
                .then_with(|| a.seq.cmp(&b.seq))
        });
        rows
    }
}
