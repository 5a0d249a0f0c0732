//! 通用 JSON 读数适配

use crate::{DecodeError, FormatAdapter};
use domain::{ReadingPayload, SensorReading};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenericShape {
    Single,
    Batch,
}

/// 通用适配器：报文本身就是规范读数（或其数组）。
#[derive(Debug, Clone, Copy)]
pub struct GenericAdapter {
    shape: GenericShape,
}

impl GenericAdapter {
    /// 单条读数对象。
    pub fn single() -> Self {
        Self {
            shape: GenericShape::Single,
        }
    }

    /// 读数数组；空数组可以解码，由流水线拒绝。
    pub fn batch() -> Self {
        Self {
            shape: GenericShape::Batch,
        }
    }
}

impl FormatAdapter for GenericAdapter {
    fn kind(&self) -> &'static str {
        match self.shape {
            GenericShape::Single => "general",
            GenericShape::Batch => "general_batch",
        }
    }

    fn decode(&self, raw: &[u8]) -> Result<ReadingPayload, DecodeError> {
        match self.shape {
            GenericShape::Single => serde_json::from_slice::<SensorReading>(raw)
                .map(ReadingPayload::Single)
                .map_err(DecodeError::Json),
            GenericShape::Batch => serde_json::from_slice::<Vec<SensorReading>>(raw)
                .map(ReadingPayload::Batch)
                .map_err(DecodeError::JsonArray),
        }
    }
}
