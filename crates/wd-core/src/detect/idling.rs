//! Idling: a resource taking conspicuously long, relative to others,
//! relative to itself, or through long same-day breaks.

use super::DetectorInput;
use crate::normalize::{case_ranges, TimedRecord};
use std::collections::HashMap;
use wd_common::{Finding, PatternKind, ResourceId, RunConfig};

pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut findings = detect_slow_combinations(input, config);
    findings.extend(detect_breaks(input, config));
    findings
}

/// Two per-(resource, activity) comparisons over the mean-duration
/// tables, both additive:
///
/// * against the activity's mean across all resources (the resource is
///   slow at this activity);
/// * against the resource's own cross-activity mean (the activity is
///   slow for this resource).
///
/// Combinations missing either mean are skipped.
fn detect_slow_combinations(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let tables = input.tables;
    let mut findings = Vec::new();

    for resource in input.log.resource_ids() {
        for activity in input.log.activity_ids() {
            let Some(own) = tables.mean_duration(resource, activity) else {
                continue;
            };

            if let Some(activity_mean) = tables.activity_mean_duration(activity) {
                if own - activity_mean > config.idling_resource_secs {
                    findings.push(
                        Finding::new(
                            PatternKind::IdlingResource,
                            "The resource takes significantly longer for the activity than the average resource",
                        )
                        .with_resource(input.log.resource_name(resource))
                        .with_activity(input.log.activity_name(activity))
                        .with_metric("mean_secs", own)
                        .with_metric("activity_mean_secs", activity_mean),
                    );
                }
            }

            if let Some(cross_mean) = tables.resource_cross_activity_mean(resource) {
                if own - cross_mean > config.idling_activity_secs {
                    findings.push(
                        Finding::new(
                            PatternKind::IdlingActivity,
                            "The resource takes significantly longer for the activity than for its other activities",
                        )
                        .with_resource(input.log.resource_name(resource))
                        .with_activity(input.log.activity_name(activity))
                        .with_metric("mean_secs", own)
                        .with_metric("resource_mean_secs", cross_mean),
                    );
                }
            }
        }
    }
    findings
}

/// Same-day gaps between a resource's last completed event in a case and
/// its next started one. Gaps spanning midnight are overnight rest, not
/// idling, and tracking resets at case boundaries.
fn detect_breaks(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (case, range) in case_ranges(input.timed, |r| r.case) {
        let mut last_complete: HashMap<ResourceId, &TimedRecord> = HashMap::new();
        for record in &input.timed[range] {
            if record.lifecycle.is_start() {
                if let Some(prev) = last_complete.get(&record.resource) {
                    if prev.timestamp.date_naive() == record.timestamp.date_naive() {
                        let gap = (record.timestamp - prev.timestamp).num_milliseconds() as f64
                            / 1000.0;
                        if gap > config.idling_break_secs {
                            findings.push(
                                Finding::new(
                                    PatternKind::IdlingBreak,
                                    "The resource takes a long same-day break after completing the activity before starting its next task",
                                )
                                .with_resource(input.log.resource_name(record.resource))
                                .with_activity(input.log.activity_name(prev.activity))
                                .with_case(input.log.case_name(case))
                                .with_metric("gap_secs", gap),
                            );
                        }
                    }
                }
            } else if record.lifecycle.is_complete() {
                last_complete.insert(record.resource, record);
            }
        }
    }
    findings
}
