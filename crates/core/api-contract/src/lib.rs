//! 稳定的 DTO 与 API 响应契约。

use domain::ValidationErrorDetail;
use serde::{Deserialize, Serialize};

/// 错误明细：文本诊断或校验失败列表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Validation(Vec<ValidationErrorDetail>),
    Text(String),
}

/// 全部端点统一的错误体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl ApiError {
    /// 无明细的错误（服务端错误只返回通用消息）。
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_text(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(ErrorDetails::Text(details.into())),
        }
    }

    pub fn validation(details: Vec<ValidationErrorDetail>) -> Self {
        Self {
            message: "Validation Error".to_string(),
            details: Some(ErrorDetails::Validation(details)),
        }
    }
}

/// 单条读数入队确认。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingAccepted {
    pub status: String,
    pub ship_id: String,
    pub cargo_id: String,
}

impl ReadingAccepted {
    pub fn new(ship_id: impl Into<String>, cargo_id: impl Into<String>) -> Self {
        Self {
            status: "Data received and queued".to_string(),
            ship_id: ship_id.into(),
            cargo_id: cargo_id.into(),
        }
    }
}

/// 批量入队确认。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAccepted {
    pub status: String,
    pub count: usize,
}

impl BatchAccepted {
    pub fn new(count: usize) -> Self {
        Self {
            status: "Batch data received and queued".to_string(),
            count,
        }
    }
}

/// 接入计数快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub requests_received: u64,
    pub readings_accepted: u64,
    pub decode_failures: u64,
    pub validation_failures: u64,
    pub envelope_failures: u64,
    pub enqueue_success: u64,
    pub enqueue_failure: u64,
    pub enqueue_latency_ms_total: u64,
    pub enqueue_latency_ms_count: u64,
}
