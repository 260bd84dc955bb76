// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET  /health
// - POST /quality
// - POST /alerts (present batch + empty batch → null)
// - POST /alerts/dismiss
// - POST /alerts/review

use serde_json::json;
use serde_json::Value as Json;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use drift_sentinel::api;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses (minus /metrics).
fn test_router() -> Router {
    api::router()
}

async fn post_json(app: Router, uri: &str, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build request");

    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let body: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "ok", "health body should be 'ok'");
}

#[tokio::test]
async fn quality_returns_expected_view_fields() {
    let app = test_router();

    let payload = json!({
        "score": 0.92,
        "sourcesWithDrift": ["src_a"],
        "lowConfidenceSources": [],
        "totalSources": 10
    });
    let (status, body) = post_json(app, "/quality", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], json!("high"));
    assert_eq!(body["trend"], json!("improving"));
    assert_eq!(body["healthy"], json!(9));
    assert_eq!(body["drifted"], json!(1));
    assert_eq!(body["lowConfidence"], json!(0));
}

#[tokio::test]
async fn alerts_empty_batch_returns_null() {
    let app = test_router();

    let (status, body) = post_json(app, "/alerts", json!([])).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null(), "empty batch must suppress the alert entirely");
}

#[tokio::test]
async fn alerts_batch_is_summarized_with_counts_and_order() {
    let app = test_router();

    let payload = json!([
        { "sourceId": "a", "connectorType": "postgres", "severity": "medium",
          "fieldsChanged": ["amount"], "detectedAt": null },
        { "sourceId": "b", "connectorType": "s3", "severity": "low",
          "fieldsChanged": [], "detectedAt": "2024-01-15T10:00:00Z" }
    ]);
    let (status, body) = post_json(app, "/alerts", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallSeverity"], json!("medium"));
    assert_eq!(body["severityCounts"]["high"], json!(0));
    assert_eq!(body["severityCounts"]["medium"], json!(1));
    assert_eq!(body["severityCounts"]["low"], json!(1));
    assert_eq!(
        body["summary"],
        json!("1 medium-severity change, 1 low-severity change")
    );
    // events echoed in original order
    assert_eq!(body["events"][0]["sourceId"], json!("a"));
    assert_eq!(body["events"][1]["sourceId"], json!("b"));
}

#[tokio::test]
async fn dismiss_is_fire_and_forget() {
    let app = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/alerts/dismiss")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"reason":"acknowledged in standup"}"#))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let s = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(s, "dismissed");
}

#[tokio::test]
async fn review_echoes_event_with_display_formatting() {
    let app = test_router();

    let payload = json!({
        "sourceId": "orders_db",
        "connectorType": "mysql",
        "severity": "high",
        "fieldsChanged": ["amount", "currency"],
        "detectedAt": "2024-01-15T10:00:00Z"
    });
    let (status, body) = post_json(app, "/alerts/review", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sourceId"], json!("orders_db"));
    assert_eq!(body["connectorType"], json!("mysql"));
    assert_eq!(body["fieldsChanged"], json!(["amount", "currency"]));
    assert_eq!(body["detectedAtDisplay"], json!("Jan 15, 2024, 10:00 UTC"));
}

#[tokio::test]
async fn review_without_timestamp_uses_fallback() {
    let app = test_router();

    let payload = json!({
        "sourceId": "events_stream",
        "connectorType": "kafka",
        "severity": "low",
        "fieldsChanged": []
    });
    let (status, body) = post_json(app, "/alerts/review", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detectedAtDisplay"], json!("Recently"));
}

#[tokio::test]
async fn debug_endpoints_reflect_recorded_assessments() {
    let app = test_router();

    let payload = json!({ "score": 0.75, "totalSources": 3 });
    let (status, _) = post_json(app.clone(), "/quality", payload).await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .method("GET")
        .uri("/debug/last-assessment")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let last: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(last["level"], json!("medium"));
    assert_eq!(last["trend"], json!("stable"));
    assert_eq!(last["healthy"], json!(3));

    let req = Request::builder()
        .method("GET")
        .uri("/debug/rolling")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let rolling: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(rolling["count"], json!(1));
    let avg = rolling["average"].as_f64().unwrap();
    assert!((avg - 0.75).abs() < 1e-9, "rolling average ~= 0.75, got {avg}");
}
