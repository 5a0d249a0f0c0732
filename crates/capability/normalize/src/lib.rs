//! 入站报文 → SensorReading 的格式适配。
//!
//! - [`GenericAdapter`]：通用 JSON 读数（单条 / 批量）
//! - [`TtnUplinkAdapter`]：The Things Network V3 上行 Webhook
//!
//! 两种适配器对畸形输入都返回 [`DecodeError`]，从不静默返回空结果。

pub mod frequency;
pub mod general;
pub mod identity;
pub mod ttn;

use domain::ReadingPayload;

pub use frequency::{FrequencyToken, coerce_frequency};
pub use general::GenericAdapter;
pub use identity::{DeviceIdentityMap, ReadingIdentity};
pub use ttn::{TtnUplinkAdapter, TtnUplinkMessage};

/// 解码错误，保留底层解析诊断。
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Could not parse JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("Could not parse JSON array: {0}")]
    JsonArray(#[source] serde_json::Error),
    #[error("Could not parse frequency: {0:?} is not a non-negative integer")]
    Frequency(String),
    #[error("Could not parse JSON: decoded_payload key {0:?} is reserved for reading fields")]
    ReservedMetric(String),
}

/// 报文格式适配器：把原始字节解码为一条或多条读数。
pub trait FormatAdapter: Send + Sync {
    /// 适配器名称（用于日志）。
    fn kind(&self) -> &'static str;

    fn decode(&self, raw: &[u8]) -> Result<ReadingPayload, DecodeError>;
}
