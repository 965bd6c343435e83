//! Social loafing: a resource performing worse in group work than alone.

use super::DetectorInput;
use wd_common::{Finding, PatternKind, RunConfig};
use wd_math::MeanAccumulator;

/// Fires per resource when its mean group-work duration exceeds its mean
/// individual-work duration by more than the absolute threshold. Only
/// this direction fires; being faster in groups is not loafing.
/// Resources with zero events in either category are skipped.
pub fn detect(input: DetectorInput<'_>, config: &RunConfig) -> Vec<Finding> {
    let mut group = vec![MeanAccumulator::default(); input.log.num_resources()];
    let mut individual = vec![MeanAccumulator::default(); input.log.num_resources()];

    for (event, &flagged) in input.paired.iter().zip(input.flags) {
        let bucket = if flagged {
            &mut group[event.resource.index()]
        } else {
            &mut individual[event.resource.index()]
        };
        bucket.add(event.duration_secs());
    }

    let mut findings = Vec::new();
    for resource in input.log.resource_ids() {
        let (Some(avg_group), Some(avg_individual)) = (
            group[resource.index()].mean(),
            individual[resource.index()].mean(),
        ) else {
            continue;
        };

        if avg_group - avg_individual > config.loafing_threshold_secs {
            findings.push(
                Finding::new(
                    PatternKind::SocialLoafing,
                    "The resource performs significantly better in individual work than in the context of group work",
                )
                .with_resource(input.log.resource_name(resource))
                .with_metric("avg_group_secs", avg_group)
                .with_metric("avg_individual_secs", avg_individual),
            );
        }
    }
    findings
}
