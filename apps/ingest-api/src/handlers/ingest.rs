//! 接入 handlers
//!
//! - POST /api/v1/ingest
//! - POST /api/v1/ingest/batch
//! - POST /api/v1/ingest/ttn
//!
//! handler 只负责把原始 body 交给流水线，并记录结果。

use crate::AppState;
use crate::utils::response::{accepted_response, ingest_error_response};
use axum::{body::Bytes, extract::State, response::Response};
use ingest_pipeline::{IngestAck, IngestError, Severity};
use ingest_telemetry::{
    record_decode_failure, record_enqueue_failure, record_enqueue_latency_ms,
    record_enqueue_success, record_envelope_failure, record_readings_accepted,
    record_request_received, record_validation_failure,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub async fn ingest_reading(State(state): State<AppState>, body: Bytes) -> Response {
    begin("general", &body);
    let started_at = Instant::now();
    let result = state.pipeline.ingest_single(&body).await;
    finish("general", state.pipeline.queue_name(), result, started_at)
}

pub async fn ingest_batch(State(state): State<AppState>, body: Bytes) -> Response {
    begin("general_batch", &body);
    let started_at = Instant::now();
    let result = state.pipeline.ingest_batch(&body).await;
    finish("general_batch", state.pipeline.queue_name(), result, started_at)
}

pub async fn ingest_ttn_uplink(State(state): State<AppState>, body: Bytes) -> Response {
    begin("ttn_uplink", &body);
    let started_at = Instant::now();
    let result = state.pipeline.ingest_uplink(&body).await;
    finish("ttn_uplink", state.pipeline.queue_name(), result, started_at)
}

fn begin(source: &'static str, body: &Bytes) {
    record_request_received();
    debug!(
        target: "ingest.api",
        source = source,
        payload_size = body.len(),
        "ingest_body_received"
    );
}

fn finish(
    source: &'static str,
    queue: &str,
    result: Result<IngestAck, IngestError>,
    started_at: Instant,
) -> Response {
    match result {
        Ok(ack) => {
            record_enqueue_success();
            record_readings_accepted(ack.readings() as u64);
            record_enqueue_latency_ms(started_at.elapsed().as_millis() as u64);
            match &ack {
                IngestAck::Reading { ship_id, cargo_id } => info!(
                    target: "ingest.api",
                    source = source,
                    queue = %queue,
                    ship_id = %ship_id,
                    cargo_id = %cargo_id,
                    "reading_queued"
                ),
                IngestAck::Batch { count } => info!(
                    target: "ingest.api",
                    source = source,
                    queue = %queue,
                    count = *count,
                    "batch_queued"
                ),
            }
            accepted_response(ack)
        }
        Err(err) => {
            match &err {
                IngestError::Decode(_) => record_decode_failure(),
                IngestError::EmptyBatch | IngestError::Validation(_) => {
                    record_validation_failure()
                }
                IngestError::Envelope { .. } => record_envelope_failure(),
                IngestError::Enqueue(_) => record_enqueue_failure(),
            }
            match err.severity() {
                Severity::Client => warn!(
                    target: "ingest.api",
                    source = source,
                    state = ?err.state(),
                    error = %err,
                    "ingest_rejected"
                ),
                // 服务端错误不向调用方暴露细节，只在日志中保留完整上下文
                Severity::Server => error!(
                    target: "ingest.api",
                    source = source,
                    queue = %queue,
                    state = ?err.state(),
                    error = ?err,
                    "ingest_failed"
                ),
            }
            ingest_error_response(err)
        }
    }
}
