//! Performance blow-out: durations jumping sharply between consecutive
//! occurrences, or spreading wildly across resources.

use super::DetectorInput;
use std::collections::{BTreeMap, HashMap};
use wd_common::{ActivityId, Finding, PatternKind, ResourceId, RunConfig};
use wd_math::population_std_dev;

/// Two branches share the detector:
///
/// * slowdown: walking the duration-mode records in order, an occurrence
///   of an (activity, resource) combination taking more than
///   `blowout_increase_secs` longer than the combination's previous
///   occurrence marks the combination. Later jumps overwrite earlier
///   ones, so each combination is reported at most once, with its last
///   jump.
/// * spread: per activity, the population standard deviation of the
///   per-resource mean durations exceeding `blowout_spread_secs`.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut previous: HashMap<(ActivityId, ResourceId), f64> = HashMap::new();
    let mut slower: BTreeMap<(ActivityId, ResourceId), (f64, f64)> = BTreeMap::new();

    for record in input.timed {
        let Some(duration) = record.duration else {
            continue;
        };
        let key = (record.activity, record.resource);
        if let Some(&prev) = previous.get(&key) {
            if duration > prev + config.blowout_increase_secs {
                slower.insert(key, (prev, duration));
            }
        }
        previous.insert(key, duration);
    }

    let mut findings = Vec::new();
    for ((activity, resource), (prev, duration)) in slower {
        findings.push(
            Finding::new(
                PatternKind::PerformanceBlowout,
                "The resource's duration for the activity jumped sharply between consecutive occurrences",
            )
            .with_resource(input.log.resource_name(resource))
            .with_activity(input.log.activity_name(activity))
            .with_metric("previous_secs", prev)
            .with_metric("duration_secs", duration),
        );
    }

    for activity in input.log.activity_ids() {
        let means: Vec<f64> = input
            .log
            .resource_ids()
            .filter_map(|resource| input.tables.mean_duration(resource, activity))
            .collect();
        let Some(spread) = population_std_dev(&means) else {
            continue;
        };
        if spread > config.blowout_spread_secs {
            findings.push(
                Finding::new(
                    PatternKind::PerformanceBlowout,
                    "The duration of the activity varies widely between resources",
                )
                .with_activity(input.log.activity_name(activity))
                .with_metric("std_dev_secs", spread),
            );
        }
    }
    findings
}
