use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::config::ServiceConfig;
use crate::drift::{self, DriftAlertBatch, DriftEvent};
use crate::history::History;
use crate::metrics;
use crate::quality::{self, QualityAssessment, QualityView};
use crate::rolling::RollingWindow;

#[derive(Clone)]
pub struct AppState {
    rolling: Arc<RollingWindow>,
    history: Arc<History>,
}

pub fn create_router(cfg: &ServiceConfig) -> Router {
    let state = AppState {
        rolling: Arc::new(RollingWindow::with_window(
            std::time::Duration::from_secs(cfg.rolling_window_hours * 3600),
        )),
        history: Arc::new(History::with_capacity(cfg.history_capacity)),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/quality", post(assess_quality))
        .route("/alerts", post(summarize_alerts))
        .route("/alerts/dismiss", post(dismiss_alert))
        .route("/alerts/review", post(review_event))
        .route("/debug/rolling", get(debug_rolling))
        .route("/debug/history", get(debug_history))
        .route("/debug/last-assessment", get(debug_last_assessment))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Router with default service knobs. Handy for tests and embedding.
pub fn router() -> Router {
    create_router(&ServiceConfig::default())
}

async fn assess_quality(
    State(state): State<AppState>,
    Json(body): Json<QualityAssessment>,
) -> Json<QualityView> {
    let view = quality::assess(&body);
    state.rolling.record(body.score, None);
    state.history.push(body.score, &view);
    metrics::record_quality_score(body.score);
    Json(view)
}

async fn summarize_alerts(
    State(_state): State<AppState>,
    Json(events): Json<Vec<DriftEvent>>,
) -> Json<Option<DriftAlertBatch>> {
    let batch = drift::summarize(events);
    if let Some(ref b) = batch {
        metrics::record_drift_batch(&b.severity_counts);
        tracing::info!(
            overall = b.overall_severity.label(),
            events = b.events.len(),
            "drift batch summarized"
        );
    }
    // `null` body = suppress rendering entirely (empty batch).
    Json(batch)
}

#[derive(serde::Deserialize)]
struct DismissReq {
    #[serde(default)]
    reason: Option<String>,
}

/// Fire-and-forget dismiss callback. The caller owns any persistence of the
/// dismissal; the model keeps no flag.
async fn dismiss_alert(
    State(_state): State<AppState>,
    Json(body): Json<DismissReq>,
) -> &'static str {
    tracing::info!(reason = body.reason.as_deref().unwrap_or("-"), "alert dismissed");
    "dismissed"
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewAck {
    source_id: String,
    connector_type: String,
    detected_at_display: String,
    fields_changed: Vec<String>,
}

/// Review callback: echoes the event back with its display formatting so the
/// caller can open a follow-up view without reformatting.
async fn review_event(
    State(_state): State<AppState>,
    Json(event): Json<DriftEvent>,
) -> Json<ReviewAck> {
    tracing::info!(source = %event.source_id, "drift event queued for review");
    Json(ReviewAck {
        detected_at_display: event.detected_at_display(),
        fields_changed: event.field_list().to_vec(),
        source_id: event.source_id,
        connector_type: event.connector_type,
    })
}

#[derive(serde::Serialize)]
struct RollingInfo {
    window_secs: u64,
    average: f64,
    count: usize,
}

async fn debug_rolling(State(state): State<AppState>) -> Json<RollingInfo> {
    let (avg, n) = state.rolling.average_and_count();
    Json(RollingInfo {
        window_secs: state.rolling.window_secs(),
        average: avg,
        count: n,
    })
}

#[derive(serde::Serialize)]
struct HistoryOut {
    ts_unix: u64,
    level: String,
    trend: String,
    score: f64,
    healthy: usize,
    drifted: usize,
    low_confidence: usize,
}

fn history_row(h: crate::history::HistoryEntry) -> HistoryOut {
    HistoryOut {
        ts_unix: h.ts_unix,
        level: format!("{:?}", h.level).to_lowercase(),
        trend: format!("{:?}", h.trend).to_lowercase(),
        score: h.score,
        healthy: h.healthy,
        drifted: h.drifted,
        low_confidence: h.low_confidence,
    }
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryOut>> {
    let rows = state.history.snapshot_last_n(10);
    Json(rows.into_iter().map(history_row).collect())
}

async fn debug_last_assessment(State(state): State<AppState>) -> Json<Option<HistoryOut>> {
    let mut rows = state.history.snapshot_last_n(1);
    Json(rows.pop().map(history_row))
}
