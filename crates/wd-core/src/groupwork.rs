//! Group-work classification over paired events.
//!
//! Four structural heuristics decide, per event, whether it was performed
//! as part of a group interaction. Heuristics only ever set the flag
//! (never clear it), so the result is independent of evaluation order,
//! and every heuristic is evaluated strictly within one case -
//! cross-case interactions never count.

use crate::normalize::{case_ranges, PairedEvent};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use wd_common::ResourceId;

/// Event count above which a resource counts as high-volume in a case.
const HIGH_VOLUME_EVENTS: u32 = 9;

/// Width of a short co-occurrence interval.
const CO_OCCURRENCE_WINDOW_SECS: i64 = 600;

/// Distinct interval count above which a resource's case is flagged.
const CLUSTERED_INTERVALS: usize = 2;

/// Compute the group-work flag for every paired event.
///
/// Input must be sorted by case (as produced by
/// [`crate::normalize::pair_events`]); the returned vector is parallel to
/// the input.
pub fn classify_group_work(events: &[PairedEvent]) -> Vec<bool> {
    let mut flags = vec![false; events.len()];
    for (_, range) in case_ranges(events, |e| e.case) {
        classify_case(events, range, &mut flags);
    }
    flags
}

fn classify_case(events: &[PairedEvent], range: std::ops::Range<usize>, flags: &mut [bool]) {
    overlap_and_shared_activity(events, range.clone(), flags);
    high_volume_co_presence(events, range.clone(), flags);
    clustered_co_occurrence(events, range, flags);
}

/// Heuristics 1 and 2: inclusive temporal overlap between different
/// resources, and shared activity between different resources regardless
/// of timing. Both are symmetric, so unordered pairs suffice.
fn overlap_and_shared_activity(
    events: &[PairedEvent],
    range: std::ops::Range<usize>,
    flags: &mut [bool],
) {
    for i in range.clone() {
        for j in (i + 1)..range.end {
            let (a, b) = (&events[i], &events[j]);
            if a.resource == b.resource {
                continue;
            }
            let overlaps = a.start <= b.complete && a.complete >= b.start;
            if overlaps || a.activity == b.activity {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
}

/// Heuristic 3: when two distinct resources each have more than
/// [`HIGH_VOLUME_EVENTS`] events in the case, every event of both
/// resources in the case is flagged, not just a qualifying pair.
fn high_volume_co_presence(
    events: &[PairedEvent],
    range: std::ops::Range<usize>,
    flags: &mut [bool],
) {
    let mut counts: HashMap<ResourceId, u32> = HashMap::new();
    for event in &events[range.clone()] {
        *counts.entry(event.resource).or_insert(0) += 1;
    }
    let heavy: HashSet<ResourceId> = counts
        .iter()
        .filter(|(_, &count)| count > HIGH_VOLUME_EVENTS)
        .map(|(&resource, _)| resource)
        .collect();
    if heavy.len() < 2 {
        return;
    }
    for i in range {
        if heavy.contains(&events[i].resource) {
            flags[i] = true;
        }
    }
}

/// Heuristic 4: clustered short-interval co-occurrence. A qualifying
/// event pair records the literal (completeA, completeB) timestamp pair
/// in both resources' interval sets; a resource accumulating more than
/// [`CLUSTERED_INTERVALS`] distinct intervals has all its events in the
/// case flagged.
///
/// Dedup is by the literal timestamp pair. Structurally similar but not
/// byte-identical co-occurrences count separately; that looseness is part
/// of the contract, not something to normalize away.
fn clustered_co_occurrence(
    events: &[PairedEvent],
    range: std::ops::Range<usize>,
    flags: &mut [bool],
) {
    let window = Duration::seconds(CO_OCCURRENCE_WINDOW_SECS);

    let mut by_resource: BTreeMap<ResourceId, Vec<usize>> = BTreeMap::new();
    for i in range.clone() {
        by_resource.entry(events[i].resource).or_default().push(i);
    }

    type IntervalSet = HashSet<(DateTime<Utc>, DateTime<Utc>)>;
    let mut intervals: HashMap<ResourceId, IntervalSet> = HashMap::new();

    let resources: Vec<ResourceId> = by_resource.keys().copied().collect();
    for (pos, &ra) in resources.iter().enumerate() {
        for &rb in &resources[pos + 1..] {
            for &ia in &by_resource[&ra] {
                for &ib in &by_resource[&rb] {
                    let (a, b) = (&events[ia], &events[ib]);
                    let completes_close = (a.complete - b.complete).abs() <= window;
                    let starts_close = (a.start - b.start).abs() <= window;
                    if completes_close || starts_close {
                        let interval = (a.complete, b.complete);
                        intervals.entry(ra).or_default().insert(interval);
                        intervals.entry(rb).or_default().insert(interval);
                    }
                }
            }
        }
    }

    for (resource, set) in intervals {
        if set.len() > CLUSTERED_INTERVALS {
            for i in range.clone() {
                if events[i].resource == resource {
                    flags[i] = true;
                }
            }
        }
    }
}
