//! Performance masking: near-zero-duration events buried in oversized
//! cases with suspicious activity recurrence.

use super::DetectorInput;
use std::collections::HashMap;
use wd_common::{ActivityId, CaseId, Finding, PatternKind, RunConfig};

/// Fires per event whose computed duration is below the absolute bound
/// while its case is oversized (event count above `avg_case_size *
/// case_size_factor`) and its activity recurs within the case above
/// `avg_activity_per_case * recurrence_factor`. All three conditions
/// must hold; events without a duration are skipped.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let thresholds = &config.masking;
    let tables = input.tables;

    let mut recurrence: HashMap<(CaseId, ActivityId), u64> = HashMap::new();
    for record in input.timed {
        *recurrence.entry((record.case, record.activity)).or_insert(0) += 1;
    }

    let case_size_bound = tables.avg_case_size() * thresholds.case_size_factor;

    let mut findings = Vec::new();
    for record in input.timed {
        let Some(duration) = record.duration else {
            continue;
        };
        if duration >= thresholds.max_duration_secs {
            continue;
        }
        let case_size = tables.case_count(record.case) as f64;
        if case_size <= case_size_bound {
            continue;
        }
        let count = recurrence[&(record.case, record.activity)] as f64;
        let recurrence_bound =
            tables.avg_activity_per_case(record.activity) * thresholds.recurrence_factor;
        if count <= recurrence_bound {
            continue;
        }

        findings.push(
            Finding::new(
                PatternKind::PerformanceMasking,
                "The resource hides a near-instant repetition of the activity inside an oversized case, possibly masking its true performance",
            )
            .with_resource(input.log.resource_name(record.resource))
            .with_activity(input.log.activity_name(record.activity))
            .with_case(input.log.case_name(record.case))
            .with_metric("duration_secs", duration)
            .with_metric("case_size", case_size)
            .with_metric("activity_recurrence", count),
        );
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::tests_support::raw;
    use crate::normalize::{timed_records, EventLog};
    use crate::stats::AggregateTables;
    use wd_common::{Lifecycle, MaskingThresholds};

    fn run(records: Vec<wd_common::RawRecord>, thresholds: MaskingThresholds) -> Vec<Finding> {
        let log = EventLog::from_records(&records);
        let timed = timed_records(&log);
        let tables = AggregateTables::build(&log, &timed);
        let config = RunConfig {
            masking: thresholds,
            ..RunConfig::default()
        };
        detect(
            DetectorInput {
                log: &log,
                paired: &[],
                flags: &[],
                timed: &timed,
                tables: &tables,
            },
            &config,
        )
    }

    /// One small "normal" case plus one big case where "Stamp" repeats
    /// with the given gaps.
    fn scenario(gaps: &[i64]) -> Vec<wd_common::RawRecord> {
        let mut records = vec![
            raw("small", "Review", "Alice", 0, Lifecycle::Complete),
            raw("small", "Approve", "Alice", 100, Lifecycle::Complete),
        ];
        let mut t = 0;
        records.push(raw("big", "Stamp", "Bob", t, Lifecycle::Complete));
        for &gap in gaps {
            t += gap;
            records.push(raw("big", "Stamp", "Bob", t, Lifecycle::Complete));
        }
        records
    }

    #[test]
    fn rapid_recurrence_in_oversized_case_fires() {
        // Big case has 8 events against an average case size of 5, so it
        // clears the 1.5x bound; "Stamp" recurs 8x against a per-case
        // average of 4; each 10s gap is under the 60s duration bound. The
        // first "Stamp" record has no duration, leaving 7 findings.
        let findings = run(scenario(&[10; 7]), MaskingThresholds::default());
        assert_eq!(findings.len(), 7);
        assert_eq!(findings[0].resources, vec!["Bob".to_string()]);
        assert_eq!(findings[0].activity.as_deref(), Some("Stamp"));
        assert_eq!(findings[0].cases, vec!["big".to_string()]);
        assert_eq!(findings[0].metrics["duration_secs"], 10.0);
        assert_eq!(findings[0].metrics["case_size"], 8.0);
        assert_eq!(findings[0].metrics["activity_recurrence"], 8.0);
    }

    #[test]
    fn slow_repetitions_do_not_fire() {
        let findings = run(scenario(&[600; 7]), MaskingThresholds::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn normal_case_size_does_not_fire() {
        // Raising the case-size factor puts the big case under the bound.
        let thresholds = MaskingThresholds {
            case_size_factor: 2.0,
            ..MaskingThresholds::default()
        };
        assert!(run(scenario(&[10; 7]), thresholds).is_empty());
    }

    #[test]
    fn records_without_duration_are_skipped() {
        // Only the first "Stamp" record lacks a duration; with a single
        // event per gap the recurrence bound still filters everything.
        let records = vec![
            raw("big", "Stamp", "Bob", 0, Lifecycle::Complete),
            raw("big", "Review", "Bob", 10, Lifecycle::Complete),
        ];
        assert!(run(records, MaskingThresholds::default()).is_empty());
    }
}
