//! The Finding record emitted by every deviance detector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The deviance pattern a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    SocialLoafing,
    PeerMobbing,
    BossMobbing,
    SocialBorrowing,
    ActivityDeviation,
    Reordering,
    PerformanceMasking,
    PreferentialSelectionAverage,
    PreferentialSelectionFcfs,
    PerformanceBlowout,
    OverworkHiding,
    IdlingResource,
    IdlingActivity,
    IdlingBreak,
    GoldPlatingDuration,
    GoldPlatingRarity,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternKind::SocialLoafing => "social_loafing",
            PatternKind::PeerMobbing => "peer_mobbing",
            PatternKind::BossMobbing => "boss_mobbing",
            PatternKind::SocialBorrowing => "social_borrowing",
            PatternKind::ActivityDeviation => "activity_deviation",
            PatternKind::Reordering => "reordering",
            PatternKind::PerformanceMasking => "performance_masking",
            PatternKind::PreferentialSelectionAverage => "preferential_selection_average",
            PatternKind::PreferentialSelectionFcfs => "preferential_selection_fcfs",
            PatternKind::PerformanceBlowout => "performance_blowout",
            PatternKind::OverworkHiding => "overwork_hiding",
            PatternKind::IdlingResource => "idling_resource",
            PatternKind::IdlingActivity => "idling_activity",
            PatternKind::IdlingBreak => "idling_break",
            PatternKind::GoldPlatingDuration => "gold_plating_duration",
            PatternKind::GoldPlatingRarity => "gold_plating_rarity",
        };
        write!(f, "{}", name)
    }
}

/// One reported instance of a suspected deviance pattern.
///
/// Findings are flat, append-only records. The same resource, case, or
/// activity may legitimately appear in findings from several detectors,
/// or several times from one detector triggered by different evidence;
/// nothing here is deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// The pattern this finding reports.
    pub pattern: PatternKind,

    /// The resources involved. Detectors that distinguish roles (victim
    /// vs. initiators) list the subject of the finding first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    /// The activity involved, when one is implicated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,

    /// The cases involved. Most detectors implicate at most one case;
    /// the gold-plating detectors implicate every case of a process
    /// variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<String>,

    /// Supporting metric values, keyed by metric name. A BTreeMap keeps
    /// serialization order stable across runs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,

    /// Human-readable explanation of the suspected pattern.
    pub explanation: String,
}

impl Finding {
    pub fn new(pattern: PatternKind, explanation: impl Into<String>) -> Self {
        Finding {
            pattern,
            resources: Vec::new(),
            activity: None,
            cases: Vec::new(),
            metrics: BTreeMap::new(),
            explanation: explanation.into(),
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources.extend(resources.into_iter().map(Into::into));
        self
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.cases.push(case.into());
        self
    }

    pub fn with_cases<I, S>(mut self, cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cases.extend(cases.into_iter().map(Into::into));
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}
