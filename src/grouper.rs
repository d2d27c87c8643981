//! Event grouping
//!
//! Partitions the parsed event stream into per-home groups ordered by start
//! time. Homes are the unit of parallelism downstream: groups are disjoint,
//! so derivation tasks never contend.

use crate::types::{HomeGroup, TuneEvent};

/// Grouper for partitioning events by home
pub struct Grouper;

impl Grouper {
    /// Stable-sort events by `(home_no, start_time)` and partition them into
    /// contiguous per-home runs.
    ///
    /// Groups come back in ascending home order, which is deterministic for
    /// any input permutation. Events that tie on start time keep their input
    /// order. Empty input yields no groups.
    pub fn group(mut events: Vec<TuneEvent>) -> Vec<HomeGroup> {
        events.sort_by(|a, b| {
            a.home_no
                .cmp(&b.home_no)
                .then_with(|| a.start_time.cmp(&b.start_time))
        });

        let mut groups: Vec<HomeGroup> = Vec::new();

        for event in events {
            let new_home = groups
                .last()
                .map_or(true, |group| group.home_no != event.home_no);
            if new_home {
                groups.push(HomeGroup {
                    home_no: event.home_no.clone(),
                    events: Vec::new(),
                });
            }
            if let Some(group) = groups.last_mut() {
                group.events.push(event);
            }
        }

        groups
    }
}
