//! Preferential work selection: cherry-picking tasks, seen either as a
//! frequency skew or as starting new work before finishing the old.

use super::DetectorInput;
use wd_common::{Finding, PatternKind, RunConfig};

pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut findings = detect_average(input, config);
    findings.extend(detect_fcfs(input));
    findings
}

/// Frequency skew: a resource performing an activity far more often than
/// the per-resource average. The threshold scales with the number of
/// resources, and only over-selection fires; performing an activity
/// rarely is not preferential selection. Combinations the resource never
/// performed are skipped.
fn detect_average(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let tables = input.tables;
    let threshold = config.preferential_deviation_factor * input.log.num_resources() as f64;

    let mut findings = Vec::new();
    for resource in input.log.resource_ids() {
        for activity in input.log.activity_ids() {
            let count = tables.freq(resource, activity);
            if count == 0 {
                continue;
            }
            let deviation = count as f64 - tables.avg_freq(activity);
            if deviation.abs() > threshold && deviation > 0.0 {
                findings.push(
                    Finding::new(
                        PatternKind::PreferentialSelectionAverage,
                        "The resource performs the activity significantly more often than the average resource, indicating possible preferential work selection",
                    )
                    .with_resource(input.log.resource_name(resource))
                    .with_activity(input.log.activity_name(activity))
                    .with_metric("frequency", count as f64)
                    .with_metric("avg_frequency", tables.avg_freq(activity))
                    .with_metric("deviation", deviation),
                );
            }
        }
    }
    findings
}

/// First-come-first-served violation: while one started task is still
/// open (its earliest matching complete lies in the future), the same
/// resource starts work on a different case. Each such later start is
/// reported against the task it jumped ahead of.
fn detect_fcfs(input: DetectorInput<'_>) -> Vec<Finding> {
    let records = &input.log.records;
    let mut findings = Vec::new();

    for open in records.iter().filter(|r| r.lifecycle.is_start()) {
        let complete_ts = records
            .iter()
            .filter(|r| {
                r.lifecycle.is_complete()
                    && r.case == open.case
                    && r.resource == open.resource
                    && r.activity == open.activity
            })
            .map(|r| r.timestamp)
            .min();
        let Some(complete_ts) = complete_ts else {
            continue;
        };

        for jumped in records.iter().filter(|r| {
            r.lifecycle.is_start()
                && r.resource == open.resource
                && r.case != open.case
                && r.timestamp > open.timestamp
                && r.timestamp < complete_ts
        }) {
            findings.push(
                Finding::new(
                    PatternKind::PreferentialSelectionFcfs,
                    "The resource starts the listed activity while an earlier-started task in another case is still open, violating first-come-first-served order",
                )
                .with_resource(input.log.resource_name(jumped.resource))
                .with_activity(input.log.activity_name(jumped.activity))
                .with_case(input.log.case_name(jumped.case)),
            );
        }
    }
    findings
}
