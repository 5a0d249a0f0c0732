//! 路由定义
//!
//! - 健康检查：/health
//! - 计数快照：/metrics
//! - 读数接入：/api/v1/ingest, /api/v1/ingest/batch
//! - TTN Webhook：/api/v1/ingest/ttn

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/api/v1/ingest", post(ingest_reading))
        .route("/api/v1/ingest/batch", post(ingest_batch))
        .route("/api/v1/ingest/ttn", post(ingest_ttn_uplink))
}
