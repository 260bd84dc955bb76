//! # Drift Aggregator
//! Summarizes a batch of schema-drift events for alerting and supports the
//! per-event drill-down view. Stateless; every operation is a pure function
//! of its input.
//!
//! Policy: batch severity is rank-based, not majority or average. Any single
//! high-severity event dominates the whole batch so operators never
//! underestimate risk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback shown when a detection timestamp is absent or unparseable.
const DETECTED_AT_FALLBACK: &str = "Recently";

/// Ordinal impact classification of a drift event.
/// `Ord` follows alarm rank: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// One detected drift, one per affected source in a batch.
/// Field names mirror the dashboard feed (camelCase on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftEvent {
    pub source_id: String,
    pub connector_type: String,
    pub severity: Severity,
    /// Changed fields in detection order. May be empty; not deduplicated.
    #[serde(default)]
    pub fields_changed: Vec<String>,
    /// ISO-8601 detection time, absent when unknown.
    #[serde(default)]
    pub detected_at: Option<String>,
}

/// Per-severity tally over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Derived alert summary. Recomputed from fresh input on every evaluation;
/// no persisted identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftAlertBatch {
    pub overall_severity: Severity,
    pub severity_counts: SeverityCounts,
    /// Human-readable clause listing non-zero counts, high first.
    pub summary: String,
    /// Input events echoed in their original order.
    pub events: Vec<DriftEvent>,
}

/// Summarize a batch of drift events.
///
/// An empty batch returns `None` — "suppress rendering entirely" — which is
/// distinct from a present batch with zero severities (impossible, since
/// every event carries exactly one severity).
pub fn summarize(events: Vec<DriftEvent>) -> Option<DriftAlertBatch> {
    if events.is_empty() {
        return None;
    }

    let mut counts = SeverityCounts::default();
    for ev in &events {
        match ev.severity {
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
        }
    }

    // Most alarming wins: any high makes the batch high.
    let overall_severity = if counts.high > 0 {
        Severity::High
    } else if counts.medium > 0 {
        Severity::Medium
    } else {
        Severity::Low
    };

    Some(DriftAlertBatch {
        overall_severity,
        severity_counts: counts,
        summary: summary_line(&counts),
        events,
    })
}

/// Non-zero counts in fixed order high, medium, low; zero counts omitted;
/// each segment pluralized on its own.
pub fn summary_line(counts: &SeverityCounts) -> String {
    let mut parts = Vec::with_capacity(3);
    for (n, label) in [
        (counts.high, Severity::High.label()),
        (counts.medium, Severity::Medium.label()),
        (counts.low, Severity::Low.label()),
    ] {
        if n > 0 {
            let noun = if n == 1 { "change" } else { "changes" };
            parts.push(format!("{n} {label}-severity {noun}"));
        }
    }
    parts.join(", ")
}

impl DriftEvent {
    /// Changed-field labels for the drill-down view, verbatim. Detection
    /// order is the most meaningful order for an operator reviewing a drift,
    /// so no dedup and no sorting.
    pub fn field_list(&self) -> &[String] {
        &self.fields_changed
    }

    /// Display string for this event's detection time. See
    /// [`format_detected_at`].
    pub fn detected_at_display(&self) -> String {
        format_detected_at(self.detected_at.as_deref())
    }
}

/// Best-effort display rendering of a detection timestamp.
///
/// Absent or malformed input falls back to a fixed literal; parse failure is
/// absorbed here and never surfaces to the caller.
pub fn format_detected_at(ts: Option<&str>) -> String {
    match ts.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) {
        Some(dt) => dt
            .with_timezone(&Utc)
            .format("%b %-d, %Y, %H:%M UTC")
            .to_string(),
        None => DETECTED_AT_FALLBACK.to_string(),
    }
}
