//! 接入流水线：解码 → 校验 → 封装 → 入队。
//!
//! 每个请求独立执行，流水线本身不持有跨请求的可变状态；
//! 唯一共享的资源是注入的队列网关。生产端不做任何重试。

use domain::{QueuedEnvelope, ReadingPayload, ValidationErrorDetail};
use ingest_normalize::{
    DecodeError, DeviceIdentityMap, FormatAdapter, GenericAdapter, TtnUplinkAdapter,
};
use ingest_queue::{QueueError, QueueGateway};
use ingest_validate::validate_payload;
use std::sync::Arc;
use tracing::debug;

/// 单个请求的处理状态（后四个为失败终态）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Received,
    Decoded,
    Validated,
    Enveloped,
    Enqueued,
    DecodeFailed,
    ValidationFailed,
    EnvelopeFailed,
    EnqueueFailed,
}

/// 错误归属：客户端（4xx）或服务端（5xx）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Client,
    Server,
}

/// 流水线错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Batch cannot be empty.")]
    EmptyBatch,
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationErrorDetail>),
    #[error("envelope serialization failed: {source}")]
    Envelope {
        /// 负载是否为批量（决定对外消息）。
        batch: bool,
        #[source]
        source: serde_json::Error,
    },
    #[error("queue append failed: {0}")]
    Enqueue(#[source] QueueError),
}

impl IngestError {
    pub fn severity(&self) -> Severity {
        match self {
            IngestError::Decode(_) | IngestError::EmptyBatch | IngestError::Validation(_) => {
                Severity::Client
            }
            IngestError::Envelope { .. } | IngestError::Enqueue(_) => Severity::Server,
        }
    }

    pub fn state(&self) -> IngestState {
        match self {
            IngestError::Decode(_) => IngestState::DecodeFailed,
            IngestError::EmptyBatch | IngestError::Validation(_) => IngestState::ValidationFailed,
            IngestError::Envelope { .. } => IngestState::EnvelopeFailed,
            IngestError::Enqueue(_) => IngestState::EnqueueFailed,
        }
    }
}

/// 入队成功确认。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestAck {
    Reading { ship_id: String, cargo_id: String },
    Batch { count: usize },
}

impl IngestAck {
    fn for_payload(payload: &ReadingPayload) -> Self {
        match payload {
            ReadingPayload::Single(reading) => IngestAck::Reading {
                ship_id: reading.ship_id().to_string(),
                cargo_id: reading.cargo_id().to_string(),
            },
            ReadingPayload::Batch(readings) => IngestAck::Batch {
                count: readings.len(),
            },
        }
    }

    /// 本次入队的读数条数。
    pub fn readings(&self) -> usize {
        match self {
            IngestAck::Reading { .. } => 1,
            IngestAck::Batch { count } => *count,
        }
    }
}

struct PipelineInner {
    gateway: Arc<dyn QueueGateway>,
    single: GenericAdapter,
    batch: GenericAdapter,
    uplink: TtnUplinkAdapter,
}

/// 流水线入口。
#[derive(Clone)]
pub struct IngestionPipeline {
    inner: Arc<PipelineInner>,
}

impl IngestionPipeline {
    pub fn new(gateway: Arc<dyn QueueGateway>, identities: DeviceIdentityMap) -> Self {
        let inner = PipelineInner {
            gateway,
            single: GenericAdapter::single(),
            batch: GenericAdapter::batch(),
            uplink: TtnUplinkAdapter::new(identities),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn queue_name(&self) -> &str {
        self.inner.gateway.queue_name()
    }

    /// 单条通用读数。
    pub async fn ingest_single(&self, raw: &[u8]) -> Result<IngestAck, IngestError> {
        self.ingest(&self.inner.single, raw).await
    }

    /// 通用读数数组，整批作为一条队列消息。
    pub async fn ingest_batch(&self, raw: &[u8]) -> Result<IngestAck, IngestError> {
        self.ingest(&self.inner.batch, raw).await
    }

    /// TTN V3 上行 Webhook。
    pub async fn ingest_uplink(&self, raw: &[u8]) -> Result<IngestAck, IngestError> {
        self.ingest(&self.inner.uplink, raw).await
    }

    pub async fn ingest(
        &self,
        adapter: &dyn FormatAdapter,
        raw: &[u8],
    ) -> Result<IngestAck, IngestError> {
        let payload = adapter.decode(raw)?;
        trace_state(adapter, IngestState::Decoded);

        // 空数组在语法上合法，但不进入校验器。
        if payload.is_empty() {
            return Err(IngestError::EmptyBatch);
        }
        let errors = validate_payload(&payload);
        if !errors.is_empty() {
            return Err(IngestError::Validation(errors));
        }
        trace_state(adapter, IngestState::Validated);

        let ack = IngestAck::for_payload(&payload);
        let batch = matches!(payload, ReadingPayload::Batch(_));
        let envelope = QueuedEnvelope::general(payload);
        let data = serde_json::to_string(&envelope)
            .map_err(|source| IngestError::Envelope { batch, source })?;
        trace_state(adapter, IngestState::Enveloped);

        self.inner
            .gateway
            .push(data)
            .await
            .map_err(IngestError::Enqueue)?;
        trace_state(adapter, IngestState::Enqueued);
        Ok(ack)
    }
}

fn trace_state(adapter: &dyn FormatAdapter, state: IngestState) {
    debug!(target: "ingest.pipeline", adapter = adapter.kind(), state = ?state, "ingest_state");
}
