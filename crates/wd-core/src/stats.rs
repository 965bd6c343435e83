//! Aggregate statistics snapshot shared by every deviance detector.
//!
//! Built once from the normalized views before any detector runs and
//! never updated afterwards. Several detector thresholds are defined
//! relative to these values, so re-deriving them must be bit-identical;
//! keeping one snapshot and handing out read-only access makes that
//! trivially true.
//!
//! Missing keys read as zero (frequencies) or `None` (mean durations) -
//! an activity never performed by a resource is not a missing-key fault.

use crate::normalize::{EventLog, TimedRecord};
use std::collections::HashMap;
use wd_common::{ActivityId, CaseId, ResourceId};
use wd_math::MeanAccumulator;

/// Frequency and duration tables over the full event set.
#[derive(Debug, Clone, Default)]
pub struct AggregateTables {
    num_resources: usize,
    num_cases: usize,
    num_activities: usize,
    total_records: usize,
    freq: HashMap<(ResourceId, ActivityId), u64>,
    total_freq: HashMap<ActivityId, u64>,
    duration: HashMap<(ResourceId, ActivityId), MeanAccumulator>,
    activity_duration: HashMap<ActivityId, MeanAccumulator>,
    overall_duration: MeanAccumulator,
    case_counts: HashMap<CaseId, u64>,
}

impl AggregateTables {
    /// Snapshot the tables from the duration-mode view.
    ///
    /// Frequencies and case sizes count every record; duration aggregates
    /// only see records that carry a computed duration.
    pub fn build(log: &EventLog, timed: &[TimedRecord]) -> Self {
        let mut tables = AggregateTables {
            num_resources: log.num_resources(),
            num_cases: log.num_cases(),
            num_activities: log.num_activities(),
            total_records: timed.len(),
            ..AggregateTables::default()
        };

        for record in timed {
            *tables
                .freq
                .entry((record.resource, record.activity))
                .or_insert(0) += 1;
            *tables.total_freq.entry(record.activity).or_insert(0) += 1;
            *tables.case_counts.entry(record.case).or_insert(0) += 1;

            if let Some(duration) = record.duration {
                tables
                    .duration
                    .entry((record.resource, record.activity))
                    .or_default()
                    .add(duration);
                tables
                    .activity_duration
                    .entry(record.activity)
                    .or_default()
                    .add(duration);
                tables.overall_duration.add(duration);
            }
        }

        tables
    }

    pub fn num_resources(&self) -> usize {
        self.num_resources
    }

    pub fn num_cases(&self) -> usize {
        self.num_cases
    }

    pub fn num_activities(&self) -> usize {
        self.num_activities
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    /// Count of events matching both keys; zero when absent.
    pub fn freq(&self, resource: ResourceId, activity: ActivityId) -> u64 {
        self.freq.get(&(resource, activity)).copied().unwrap_or(0)
    }

    /// Count of events for an activity across all resources.
    pub fn total_freq(&self, activity: ActivityId) -> u64 {
        self.total_freq.get(&activity).copied().unwrap_or(0)
    }

    /// Average per-resource frequency of an activity.
    pub fn avg_freq(&self, activity: ActivityId) -> f64 {
        if self.num_resources == 0 {
            return 0.0;
        }
        self.total_freq(activity) as f64 / self.num_resources as f64
    }

    /// Share of the whole log taken by an activity.
    pub fn relative_freq(&self, activity: ActivityId) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        self.total_freq(activity) as f64 / self.total_records as f64
    }

    /// Mean duration of an activity for one resource.
    pub fn mean_duration(&self, resource: ResourceId, activity: ActivityId) -> Option<f64> {
        self.duration
            .get(&(resource, activity))
            .and_then(MeanAccumulator::mean)
    }

    /// Mean duration of an activity across all resources.
    pub fn activity_mean_duration(&self, activity: ActivityId) -> Option<f64> {
        self.activity_duration
            .get(&activity)
            .and_then(MeanAccumulator::mean)
    }

    /// Mean duration over every event with a duration.
    pub fn overall_mean_duration(&self) -> Option<f64> {
        self.overall_duration.mean()
    }

    /// A resource's mean over its per-activity mean durations.
    ///
    /// Activities are visited in id order so the floating-point sum is
    /// the same on every derivation.
    pub fn resource_cross_activity_mean(&self, resource: ResourceId) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0u64;
        for activity in 0..self.num_activities as u32 {
            if let Some(mean) = self.mean_duration(resource, ActivityId(activity)) {
                sum += mean;
                count += 1;
            }
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Event count of one case; zero when absent.
    pub fn case_count(&self, case: CaseId) -> u64 {
        self.case_counts.get(&case).copied().unwrap_or(0)
    }

    /// Mean events per case.
    pub fn avg_case_size(&self) -> f64 {
        if self.num_cases == 0 {
            return 0.0;
        }
        self.total_records as f64 / self.num_cases as f64
    }

    /// Mean occurrences of an activity per case.
    pub fn avg_activity_per_case(&self, activity: ActivityId) -> f64 {
        if self.num_cases == 0 {
            return 0.0;
        }
        self.total_freq(activity) as f64 / self.num_cases as f64
    }
}
