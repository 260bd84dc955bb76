// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod drift;
pub mod history;
pub mod metrics;
pub mod quality;
pub mod rolling;

// ---- Re-exports for stable public API ----
// Convenient router access: `drift_sentinel::api::router` and `drift_sentinel::router`
pub use crate::api::router;

// Core model types, so dashboard glue can use `drift_sentinel::{...}` directly
pub use crate::drift::{summarize, DriftAlertBatch, DriftEvent, Severity, SeverityCounts};
pub use crate::quality::{
    assess, classify, trend_for, QualityAssessment, QualityLevel, QualityView, Trend,
};
