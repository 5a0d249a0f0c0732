//! 传感器遥测接入服务：通用 JSON / TTN Webhook → 校验 → Redis 队列。

mod handlers;
mod routes;
mod utils;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use ingest_config::{AppConfig, QueueBackend};
use ingest_normalize::DeviceIdentityMap;
use ingest_pipeline::IngestionPipeline;
use ingest_queue::{InMemoryQueueGateway, QueueGateway, RedisQueueGateway};
use ingest_telemetry::{init_tracing, new_request_ids};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: IngestionPipeline,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 队列网关在此显式构造，整个进程共享一个实例
    let gateway: Arc<dyn QueueGateway> = match config.queue_backend {
        QueueBackend::Redis => Arc::new(
            RedisQueueGateway::connect(&config.redis_url, &config.queue_name).await?,
        ),
        QueueBackend::Memory => {
            warn!("queue backend: memory (INGEST_QUEUE_BACKEND=memory), entries are not durable");
            Arc::new(InMemoryQueueGateway::new(config.queue_name.clone()))
        }
    };

    let identities: DeviceIdentityMap = config
        .ttn_device_map
        .iter()
        .map(|item| {
            (
                item.device_id.clone(),
                item.ship_id.clone(),
                item.cargo_id.clone(),
            )
        })
        .collect();
    info!(
        queue = %config.queue_name,
        ttn_devices = identities.len(),
        "ingest pipeline ready"
    );

    let pipeline = IngestionPipeline::new(gateway, identities);
    let app = build_app(AppState { pipeline }, config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("listening on {}", config.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// 组装路由与中间件。
pub fn build_app(state: AppState, max_body_bytes: usize) -> Router {
    routes::create_api_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
