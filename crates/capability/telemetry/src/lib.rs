//! 追踪、请求 ID 与接入计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 接入计数快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 接入计数。
#[derive(Default)]
pub struct TelemetryMetrics {
    requests_received: AtomicU64,
    readings_accepted: AtomicU64,
    decode_failures: AtomicU64,
    validation_failures: AtomicU64,
    envelope_failures: AtomicU64,
    enqueue_success: AtomicU64,
    enqueue_failure: AtomicU64,
    enqueue_latency_ms_total: AtomicU64,
    enqueue_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            readings_accepted: self.readings_accepted.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            envelope_failures: self.envelope_failures.load(Ordering::Relaxed),
            enqueue_success: self.enqueue_success.load(Ordering::Relaxed),
            enqueue_failure: self.enqueue_failure.load(Ordering::Relaxed),
            enqueue_latency_ms_total: self.enqueue_latency_ms_total.load(Ordering::Relaxed),
            enqueue_latency_ms_count: self.enqueue_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录接入请求次数。
pub fn record_request_received() {
    metrics().requests_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录入队读数条数（批量按条计）。
pub fn record_readings_accepted(count: u64) {
    metrics()
        .readings_accepted
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录解码失败次数。
pub fn record_decode_failure() {
    metrics().decode_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录校验失败次数（含空批量）。
pub fn record_validation_failure() {
    metrics().validation_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录信封序列化失败次数。
pub fn record_envelope_failure() {
    metrics().envelope_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录入队成功次数。
pub fn record_enqueue_success() {
    metrics().enqueue_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录入队失败次数。
pub fn record_enqueue_failure() {
    metrics().enqueue_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录入队延迟（毫秒）。
pub fn record_enqueue_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .enqueue_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .enqueue_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
