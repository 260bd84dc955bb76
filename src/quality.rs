//! # Quality Classifier
//! Pure, testable logic that maps a normalized health score and per-source
//! bucket memberships into a discrete, user-facing classification.
//! No I/O, suitable for unit tests and offline evaluation.
//!
//! Policy: the level bands are closed on their lower bound (0.80 and 0.60
//! exactly belong to the upper band). The trend thresholds are a separate,
//! finer-grained set feeding an auxiliary indicator only.

use serde::{Deserialize, Serialize};

/// Band thresholds for the primary level. Inclusive lower bounds.
const LEVEL_HIGH_MIN: f64 = 0.80;
const LEVEL_MEDIUM_MIN: f64 = 0.60;

/// Trend thresholds. Intentionally distinct from the level bands.
const TREND_IMPROVING_MIN: f64 = 0.85;
const TREND_STABLE_MIN: f64 = 0.70;

/// Discrete quality level shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    High,
    Medium,
    Low,
}

/// Auxiliary trend indicator derived from the same score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Assessment snapshot supplied by the monitoring collaborator.
/// Field names mirror the dashboard feed (camelCase on the wire).
///
/// `score` is expected in [0, 1]; out-of-range values are a caller contract
/// violation and fall through the same inequalities without clamping.
/// The two source lists must already be de-duplicated by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub score: f64,
    #[serde(default)]
    pub sources_with_drift: Vec<String>,
    #[serde(default)]
    pub low_confidence_sources: Vec<String>,
    /// Total monitored sources; 0 when the upstream feed does not know.
    #[serde(default)]
    pub total_sources: usize,
}

/// Healthy/drifted/low-confidence split for the summary widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePartition {
    pub healthy: usize,
    pub drifted: usize,
    pub low_confidence: usize,
}

/// Complete derived view handed to the rendering collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityView {
    pub level: QualityLevel,
    pub trend: Trend,
    pub healthy: usize,
    pub drifted: usize,
    pub low_confidence: usize,
}

/// Map a score to its level band. Total over the real line; values outside
/// [0, 1] land in `Low` or `High` by the same inequalities.
pub fn classify(score: f64) -> QualityLevel {
    if score >= LEVEL_HIGH_MIN {
        QualityLevel::High
    } else if score >= LEVEL_MEDIUM_MIN {
        QualityLevel::Medium
    } else {
        QualityLevel::Low
    }
}

/// Map a score to the auxiliary trend indicator.
pub fn trend_for(score: f64) -> Trend {
    if score >= TREND_IMPROVING_MIN {
        Trend::Improving
    } else if score >= TREND_STABLE_MIN {
        Trend::Stable
    } else {
        Trend::Declining
    }
}

/// Split the monitored population into the three display buckets.
///
/// `healthy` is floored at zero. A source present in both input sets is
/// counted in both buckets, which can make the floored `healthy` an
/// undercount; the classifier does not reconcile overlapping membership.
pub fn partition_counts(
    total_sources: usize,
    sources_with_drift: &[String],
    low_confidence_sources: &[String],
) -> SourcePartition {
    let drifted = sources_with_drift.len();
    let low_confidence = low_confidence_sources.len();
    let healthy = total_sources.saturating_sub(drifted + low_confidence);
    SourcePartition {
        healthy,
        drifted,
        low_confidence,
    }
}

/// Full assessment: level, trend and partition in one pass.
pub fn assess(input: &QualityAssessment) -> QualityView {
    let partition = partition_counts(
        input.total_sources,
        &input.sources_with_drift,
        &input.low_confidence_sources,
    );
    QualityView {
        level: classify(input.score),
        trend: trend_for(input.score),
        healthy: partition.healthy,
        drifted: partition.drifted,
        low_confidence: partition.low_confidence,
    }
}
