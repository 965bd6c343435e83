//! Gold plating: process variants embellished with extra effort, seen as
//! unusually slow variants or as rarely-performed activities.

use super::DetectorInput;
use crate::normalize::case_ranges;
use std::collections::BTreeMap;
use wd_common::{ActivityId, CaseId, Finding, PatternKind, RunConfig};
use wd_math::{mean, MeanAccumulator};

pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let variants = collect_variants(input);
    let mut findings = detect_slow_variants(input, config, &variants);
    findings.extend(detect_rare_activities(input, config, &variants));
    findings
}

/// Group cases by their activity sequence. The duration-mode view is
/// already sorted by (case, timestamp), so each case's slice reads off
/// its variant directly; the map is ordered for a deterministic report.
fn collect_variants(input: DetectorInput<'_>) -> BTreeMap<Vec<ActivityId>, Vec<CaseId>> {
    let mut variants: BTreeMap<Vec<ActivityId>, Vec<CaseId>> = BTreeMap::new();
    for (case, range) in case_ranges(input.timed, |r| r.case) {
        let sequence: Vec<ActivityId> = input.timed[range].iter().map(|r| r.activity).collect();
        variants.entry(sequence).or_default().push(case);
    }
    variants
}

/// A variant's duration is the mean over its cases' mean event
/// durations; cases without any computed duration drop out. Fires when
/// the variant exceeds the overall mean by more than
/// `overall * gold_duration_factor`.
fn detect_slow_variants(
    input: DetectorInput<'_>,
    config: &RunConfig,
    variants: &BTreeMap<Vec<ActivityId>, Vec<CaseId>>,
) -> Vec<Finding> {
    let Some(overall) = input.tables.overall_mean_duration() else {
        return Vec::new();
    };

    let mut case_means: BTreeMap<CaseId, MeanAccumulator> = BTreeMap::new();
    for record in input.timed {
        if let Some(duration) = record.duration {
            case_means.entry(record.case).or_default().add(duration);
        }
    }

    let mut findings = Vec::new();
    for (_, cases) in variants {
        let per_case: Vec<f64> = cases
            .iter()
            .filter_map(|case| case_means.get(case).and_then(MeanAccumulator::mean))
            .collect();
        let Some(variant_mean) = mean(&per_case) else {
            continue;
        };

        if variant_mean - overall > overall * config.gold_duration_factor {
            let mut finding = Finding::new(
                PatternKind::GoldPlatingDuration,
                "The listed cases follow a process variant whose events take significantly longer than the overall average, indicating possible gold plating",
            )
            .with_metric("variant_mean_secs", variant_mean)
            .with_metric("overall_mean_secs", overall);
            for &case in cases {
                finding = finding.with_case(input.log.case_name(case));
            }
            findings.push(finding);
        }
    }
    findings
}

/// Walks each variant's sequence in order and reports the first activity
/// whose share of the whole log falls below `gold_rarity_fraction`; one
/// finding per variant at most.
fn detect_rare_activities(
    input: DetectorInput<'_>,
    config: &RunConfig,
    variants: &BTreeMap<Vec<ActivityId>, Vec<CaseId>>,
) -> Vec<Finding> {
    let tables = input.tables;
    let mut findings = Vec::new();
    for (sequence, cases) in variants {
        let Some(&rare) = sequence
            .iter()
            .find(|&&activity| tables.relative_freq(activity) < config.gold_rarity_fraction)
        else {
            continue;
        };

        let proportion = tables.relative_freq(rare);
        let mut finding = Finding::new(
            PatternKind::GoldPlatingRarity,
            "The listed cases follow a process variant containing a rarely performed activity, indicating possible gold plating",
        )
        .with_activity(input.log.activity_name(rare))
        .with_metric(
            "activity_count",
            (tables.total_records() as f64 * proportion).trunc(),
        )
        .with_metric("total_count", tables.total_records() as f64);
        for &case in cases {
            finding = finding.with_case(input.log.case_name(case));
        }
        findings.push(finding);
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::tests_support::raw;
    use crate::normalize::{timed_records, EventLog};
    use crate::stats::AggregateTables;
    use wd_common::Lifecycle;

    fn run(records: Vec<wd_common::RawRecord>, config: &RunConfig) -> Vec<Finding> {
        let log = EventLog::from_records(&records);
        let timed = timed_records(&log);
        let tables = AggregateTables::build(&log, &timed);
        detect(
            DetectorInput {
                log: &log,
                paired: &[],
                flags: &[],
                timed: &timed,
                tables: &tables,
            },
            config,
        )
    }

    /// A case whose single activity repeats with the given gap, yielding
    /// `n` durations of that size.
    fn repeated(case: &str, activity: &str, gap: i64, n: usize) -> Vec<wd_common::RawRecord> {
        (0..=n)
            .map(|i| raw(case, activity, "Alice", i as i64 * gap, Lifecycle::Complete))
            .collect()
    }

    #[test]
    fn slow_variant_is_reported_with_its_cases() {
        // Variant [A, A, A] has case means 100s (c1, c2); variant
        // [B, B, B] has 1000s (slow). Overall mean is 400s, so the slow
        // variant exceeds it by 600s against a bound of 160s.
        let mut records = repeated("c1", "A", 100, 2);
        records.extend(repeated("c2", "A", 100, 2));
        records.extend(repeated("slow", "B", 1000, 2));
        let config = RunConfig {
            gold_rarity_fraction: 0.0,
            ..RunConfig::default()
        };

        let findings = run(records, &config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pattern, PatternKind::GoldPlatingDuration);
        assert_eq!(findings[0].cases, vec!["slow".to_string()]);
        assert_eq!(findings[0].metrics["variant_mean_secs"], 1000.0);
        assert_eq!(findings[0].metrics["overall_mean_secs"], 400.0);
    }

    #[test]
    fn uniform_durations_do_not_fire() {
        let mut records = repeated("c1", "A", 100, 2);
        records.extend(repeated("c2", "A", 100, 2));
        let config = RunConfig {
            gold_rarity_fraction: 0.0,
            ..RunConfig::default()
        };
        assert!(run(records, &config).is_empty());
    }

    #[test]
    fn rare_activity_in_a_variant_is_reported_once() {
        // "Polish" appears once in 25 records (4%), just under a 5%
        // fraction; both embellished cases share the variant and land in
        // one finding.
        let mut records = Vec::new();
        for i in 0..23 {
            records.push(raw(
                &format!("c{}", i % 4),
                "Review",
                "Alice",
                i * 1000,
                Lifecycle::Complete,
            ));
        }
        records.push(raw("fancy", "Review", "Alice", 100_000, Lifecycle::Complete));
        records.push(raw("fancy", "Polish", "Alice", 101_000, Lifecycle::Complete));

        let config = RunConfig {
            gold_rarity_fraction: 0.05,
            gold_duration_factor: f64::MAX,
            ..RunConfig::default()
        };
        let findings = run(records, &config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].pattern, PatternKind::GoldPlatingRarity);
        assert_eq!(findings[0].activity.as_deref(), Some("Polish"));
        assert_eq!(findings[0].cases, vec!["fancy".to_string()]);
        assert_eq!(findings[0].metrics["activity_count"], 1.0);
        assert_eq!(findings[0].metrics["total_count"], 25.0);
    }

    #[test]
    fn common_activities_do_not_fire_rarity() {
        let mut records = repeated("c1", "A", 100, 2);
        records.extend(repeated("c2", "A", 100, 2));
        let config = RunConfig {
            gold_rarity_fraction: 0.04,
            gold_duration_factor: f64::MAX,
            ..RunConfig::default()
        };
        assert!(run(records, &config).is_empty());
    }
}
