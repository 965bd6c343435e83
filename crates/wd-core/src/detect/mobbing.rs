//! Mobbing detectors: peer mobbing and boss mobbing.

use super::DetectorInput;
use wd_common::{Finding, PatternKind, RunConfig};
use wd_math::MeanAccumulator;

/// Peer mobbing: a group of resources taking an activity away from one
/// victim, showing up as the group's frequency deviating from the
/// activity average far more than the victim's.
///
/// Both thresholds are relative and truncated to whole counts: an
/// initiator must exceed the victim's deviation by more than
/// `trunc(avg_freq * peer_deviation_factor)`, and the pattern fires only
/// when the initiator count exceeds
/// `trunc(num_resources * peer_group_factor)`.
pub fn detect_peer(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let tables = input.tables;
    let num_resources = input.log.num_resources();
    let group_threshold = (num_resources as f64 * config.peer_group_factor).trunc();

    let mut findings = Vec::new();
    for activity in input.log.activity_ids() {
        let avg_freq = tables.avg_freq(activity);
        let deviation_margin = (avg_freq * config.peer_deviation_factor).trunc();

        for victim in input.log.resource_ids() {
            let victim_deviation = tables.freq(victim, activity) as f64 - avg_freq;

            let initiators: Vec<_> = input
                .log
                .resource_ids()
                .filter(|&resource| {
                    let deviation = tables.freq(resource, activity) as f64 - avg_freq;
                    deviation > victim_deviation + deviation_margin
                })
                .collect();

            if initiators.len() as f64 > group_threshold {
                let mut finding = Finding::new(
                    PatternKind::PeerMobbing,
                    "The listed group seems to perform the listed task significantly more often than the victim resource listed first, indicating possible Peer Mobbing",
                )
                .with_resource(input.log.resource_name(victim))
                .with_activity(input.log.activity_name(activity))
                .with_metric("victim_frequency", tables.freq(victim, activity) as f64)
                .with_metric("victim_deviation", victim_deviation)
                .with_metric("avg_frequency", avg_freq)
                .with_metric("initiator_count", initiators.len() as f64);
                for initiator in initiators {
                    finding = finding.with_resource(input.log.resource_name(initiator));
                }
                findings.push(finding);
            }
        }
    }
    findings
}

/// Boss mobbing: group-work durations slowing down after a boss-takeover
/// cutoff. Fires per resource present in both windows when the
/// after-mean exceeds the before-mean by more than `before * factor`.
/// Skipped entirely when no cutoff is configured.
pub fn detect_boss(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let Some(cutoff) = config.boss_takeover else {
        return Vec::new();
    };

    let mut before = vec![MeanAccumulator::default(); input.log.num_resources()];
    let mut after = vec![MeanAccumulator::default(); input.log.num_resources()];
    for (event, &flagged) in input.paired.iter().zip(input.flags) {
        if !flagged {
            continue;
        }
        let bucket = if event.complete < cutoff {
            &mut before[event.resource.index()]
        } else {
            &mut after[event.resource.index()]
        };
        bucket.add(event.duration_secs());
    }

    let mut findings = Vec::new();
    for resource in input.log.resource_ids() {
        let (Some(avg_before), Some(avg_after)) = (
            before[resource.index()].mean(),
            after[resource.index()].mean(),
        ) else {
            continue;
        };

        if avg_after - avg_before > avg_before * config.boss_slowdown_factor {
            findings.push(
                Finding::new(
                    PatternKind::BossMobbing,
                    "The resource has a significantly higher average event duration after the boss takeover",
                )
                .with_resource(input.log.resource_name(resource))
                .with_metric("avg_before_secs", avg_before)
                .with_metric("avg_after_secs", avg_after),
            );
        }
    }
    findings
}
