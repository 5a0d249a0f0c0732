//! HTTP 响应辅助函数
//!
//! 流水线结果 → 状态码 + 统一错误体：
//! - 解码 / 空批量 / 校验失败：400，附带可操作的明细
//! - 信封 / 入队失败：500，只返回通用消息

use api_contract::{ApiError, BatchAccepted, ReadingAccepted};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ingest_pipeline::{IngestAck, IngestError};

/// 入队成功响应
pub fn accepted_response(ack: IngestAck) -> Response {
    match ack {
        IngestAck::Reading { ship_id, cargo_id } => (
            StatusCode::OK,
            Json(ReadingAccepted::new(ship_id, cargo_id)),
        )
            .into_response(),
        IngestAck::Batch { count } => {
            (StatusCode::OK, Json(BatchAccepted::new(count))).into_response()
        }
    }
}

/// 流水线错误响应
pub fn ingest_error_response(err: IngestError) -> Response {
    match err {
        IngestError::Decode(err) => bad_request_error(err.to_string()),
        IngestError::EmptyBatch => bad_request_error(IngestError::EmptyBatch.to_string()),
        IngestError::Validation(details) => {
            (StatusCode::BAD_REQUEST, Json(ApiError::validation(details))).into_response()
        }
        IngestError::Envelope { batch: false, .. } => {
            internal_error("Failed to prepare data for queue")
        }
        IngestError::Envelope { batch: true, .. } => internal_error("Failed to prepare batch data"),
        IngestError::Enqueue(_) => internal_error("Failed to queue data for ingestion"),
    }
}

/// 错误请求响应
pub fn bad_request_error(details: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::with_text("Invalid request body", details)),
    )
        .into_response()
}

/// 内部错误响应
pub fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(message)),
    )
        .into_response()
}
