//! 健康检查与计数快照
//!
//! - GET /health
//! - GET /metrics

use api_contract::MetricsSnapshotDto;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ingest_telemetry::metrics;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(MetricsSnapshotDto {
            requests_received: snapshot.requests_received,
            readings_accepted: snapshot.readings_accepted,
            decode_failures: snapshot.decode_failures,
            validation_failures: snapshot.validation_failures,
            envelope_failures: snapshot.envelope_failures,
            enqueue_success: snapshot.enqueue_success,
            enqueue_failure: snapshot.enqueue_failure,
            enqueue_latency_ms_total: snapshot.enqueue_latency_ms_total,
            enqueue_latency_ms_count: snapshot.enqueue_latency_ms_count,
        }),
    )
        .into_response()
}
