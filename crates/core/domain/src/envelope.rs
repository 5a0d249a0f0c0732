use crate::reading::ReadingPayload;
use serde::{Deserialize, Serialize};

/// 信封负载：`type` 与 `data` 的形状一一对应。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum QueuedPayload {
    General(ReadingPayload),
}

impl QueuedPayload {
    /// 类型标识（与线上 `type` 字段一致）。
    pub fn kind(&self) -> &'static str {
        match self {
            QueuedPayload::General(_) => "general",
        }
    }
}

/// 推入队列的消息单元。
///
/// `retry_count` 只由下游消费者递增，生产端始终写 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedEnvelope {
    pub retry_count: u32,
    #[serde(flatten)]
    pub payload: QueuedPayload,
}

impl QueuedEnvelope {
    /// 为已通过校验的读数创建新信封。
    pub fn general(payload: ReadingPayload) -> Self {
        Self {
            retry_count: 0,
            payload: QueuedPayload::General(payload),
        }
    }
}
