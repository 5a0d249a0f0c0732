//! 接入链路共享的领域模型。
//!
//! - [`reading`]：规范化后的传感器读数
//! - [`envelope`]：推入队列的信封
//! - [`validation`]：结构化校验失败明细

pub mod envelope;
pub mod reading;
pub mod validation;

pub use envelope::{QueuedEnvelope, QueuedPayload};
pub use reading::{MetricValue, RadioMetadata, ReadingPayload, SensorReading};
pub use validation::{LocSegment, ValidationErrorDetail};
