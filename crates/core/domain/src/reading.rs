use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 指标值：数值、文本或布尔。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

/// 无线上行的链路元数据（信号质量与发射参数）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_rssi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreading_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    /// 频率（Hz）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,
}

/// 规范化后的传感器读数。
///
/// 标识字段按可缺省解码：缺失由校验器报告为 `required`，
/// 而不是在解码阶段失败。指标以顶层键的形式出现在线上格式中。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default)]
    pub ship_id: Option<String>,
    #[serde(default)]
    pub cargo_id: Option<String>,
    /// RFC 3339 时间戳。
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio: Option<RadioMetadata>,
    #[serde(flatten)]
    pub metrics: BTreeMap<String, MetricValue>,
}

impl SensorReading {
    /// 读数自身占用的顶层键，指标不得使用。
    pub const RESERVED_FIELDS: &'static [&'static str] =
        &["ship_id", "cargo_id", "timestamp", "radio"];

    pub fn new(
        ship_id: impl Into<String>,
        cargo_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            ship_id: Some(ship_id.into()),
            cargo_id: Some(cargo_id.into()),
            timestamp: Some(timestamp.into()),
            radio: None,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(name.into(), value.into());
        self
    }

    pub fn with_radio(mut self, radio: RadioMetadata) -> Self {
        self.radio = Some(radio);
        self
    }

    pub fn ship_id(&self) -> &str {
        self.ship_id.as_deref().unwrap_or_default()
    }

    pub fn cargo_id(&self) -> &str {
        self.cargo_id.as_deref().unwrap_or_default()
    }
}

/// 单条读数或有序批量读数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingPayload {
    Batch(Vec<SensorReading>),
    Single(SensorReading),
}

impl ReadingPayload {
    pub fn len(&self) -> usize {
        match self {
            ReadingPayload::Single(_) => 1,
            ReadingPayload::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
