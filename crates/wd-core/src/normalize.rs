//! Log normalization: arena indexing plus the two normalized views.
//!
//! Raw records are indexed once into an [`EventLog`] arena of interned
//! ids, then projected into the two views the rest of the engine reads:
//!
//! - **Pairing mode** ([`pair_events`]): start and complete records are
//!   joined on (resource, activity, case) into single events carrying
//!   both timestamps. The join is an inner join - unmatched records are
//!   silently dropped - and duplicate join keys yield the full
//!   cross-product. The cross-product is a faithfulness requirement of
//!   the scoring contracts, not an accident to be cleaned up.
//! - **Duration mode** ([`timed_records`]): records sorted by
//!   (case, timestamp), each carrying the gap to its predecessor with the
//!   same (case, activity) key. Start records get no duration but still
//!   advance the predecessor chain.

use chrono::{DateTime, Utc};
use wd_common::{ActivityId, CaseId, Interner, Lifecycle, RawRecord, ResourceId};

/// One indexed record inside the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub case: CaseId,
    pub activity: ActivityId,
    pub resource: ResourceId,
    pub timestamp: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// The indexed event log: interners plus records in original order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub cases: Interner,
    pub resources: Interner,
    pub activities: Interner,
    pub records: Vec<LogRecord>,
}

impl EventLog {
    /// Index raw records, interning names in first-appearance order.
    pub fn from_records(raw: &[RawRecord]) -> Self {
        let mut log = EventLog::default();
        for record in raw {
            let case = CaseId(log.cases.intern(&record.case_id));
            let activity = ActivityId(log.activities.intern(&record.activity));
            let resource = ResourceId(log.resources.intern(&record.resource));
            log.records.push(LogRecord {
                case,
                activity,
                resource,
                timestamp: record.timestamp,
                lifecycle: record.lifecycle.clone(),
            });
        }
        log
    }

    pub fn case_name(&self, id: CaseId) -> &str {
        self.cases.resolve(id.0)
    }

    pub fn resource_name(&self, id: ResourceId) -> &str {
        self.resources.resolve(id.0)
    }

    pub fn activity_name(&self, id: ActivityId) -> &str {
        self.activities.resolve(id.0)
    }

    pub fn num_cases(&self) -> usize {
        self.cases.len()
    }

    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn num_activities(&self) -> usize {
        self.activities.len()
    }

    /// All case ids in first-appearance order.
    pub fn case_ids(&self) -> impl Iterator<Item = CaseId> {
        (0..self.cases.len() as u32).map(CaseId)
    }

    /// All resource ids in first-appearance order.
    pub fn resource_ids(&self) -> impl Iterator<Item = ResourceId> {
        (0..self.resources.len() as u32).map(ResourceId)
    }

    /// All activity ids in first-appearance order.
    pub fn activity_ids(&self) -> impl Iterator<Item = ActivityId> {
        (0..self.activities.len() as u32).map(ActivityId)
    }
}

/// A merged start/complete event (pairing mode).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedEvent {
    pub case: CaseId,
    pub activity: ActivityId,
    pub resource: ResourceId,
    pub start: DateTime<Utc>,
    pub complete: DateTime<Utc>,
}

impl PairedEvent {
    /// Duration in seconds, complete minus start.
    pub fn duration_secs(&self) -> f64 {
        (self.complete - self.start).num_milliseconds() as f64 / 1000.0
    }
}

/// A record of the duration-mode view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRecord {
    pub case: CaseId,
    pub activity: ActivityId,
    pub resource: ResourceId,
    pub timestamp: DateTime<Utc>,
    pub lifecycle: Lifecycle,
    /// Seconds since the previous record with the same (case, activity)
    /// key. `None` for chain heads and for start records.
    pub duration: Option<f64>,
}

/// Join start and complete records into merged events.
///
/// Output is stably sorted by (case, start time), so within a case the
/// events are totally ordered by start with ties kept in original record
/// order.
pub fn pair_events(log: &EventLog) -> Vec<PairedEvent> {
    use std::collections::HashMap;

    let mut completes: HashMap<(CaseId, ActivityId, ResourceId), Vec<DateTime<Utc>>> =
        HashMap::new();
    for record in &log.records {
        if record.lifecycle.is_complete() {
            completes
                .entry((record.case, record.activity, record.resource))
                .or_default()
                .push(record.timestamp);
        }
    }

    let mut events = Vec::new();
    for record in &log.records {
        if !record.lifecycle.is_start() {
            continue;
        }
        let Some(matching) = completes.get(&(record.case, record.activity, record.resource))
        else {
            continue;
        };
        for &complete in matching {
            events.push(PairedEvent {
                case: record.case,
                activity: record.activity,
                resource: record.resource,
                start: record.timestamp,
                complete,
            });
        }
    }

    events.sort_by_key(|e| (e.case, e.start));
    events
}

/// Derive the duration-mode view: records sorted by (case, timestamp)
/// with gap-to-predecessor durations.
pub fn timed_records(log: &EventLog) -> Vec<TimedRecord> {
    use std::collections::HashMap;

    let mut order: Vec<usize> = (0..log.records.len()).collect();
    order.sort_by_key(|&i| (log.records[i].case, log.records[i].timestamp));

    let mut last_seen: HashMap<(CaseId, ActivityId), DateTime<Utc>> = HashMap::new();
    let mut timed = Vec::with_capacity(order.len());
    for i in order {
        let record = &log.records[i];
        let key = (record.case, record.activity);
        let gap = last_seen
            .get(&key)
            .map(|prev| (record.timestamp - *prev).num_milliseconds() as f64 / 1000.0);
        last_seen.insert(key, record.timestamp);

        let duration = if record.lifecycle.is_start() { None } else { gap };
        timed.push(TimedRecord {
            case: record.case,
            activity: record.activity,
            resource: record.resource,
            timestamp: record.timestamp,
            lifecycle: record.lifecycle.clone(),
            duration,
        });
    }
    timed
}

/// Contiguous per-case ranges of a slice already sorted by case.
pub fn case_ranges<T, F>(items: &[T], case_of: F) -> Vec<(CaseId, std::ops::Range<usize>)>
where
    F: Fn(&T) -> CaseId,
{
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < items.len() {
        let case = case_of(&items[start]);
        let mut end = start + 1;
        while end < items.len() && case_of(&items[end]) == case {
            end += 1;
        }
        ranges.push((case, start..end));
        start = end;
    }
    ranges
}
