//! The Things Network V3 上行 Webhook 适配
//!
//! 一条上行消息恰好映射为一条读数。多网关接收时按位置取第一条
//! `rx_metadata`，不按信号强度重新排序。

use crate::frequency::{FrequencyToken, coerce_frequency};
use crate::identity::DeviceIdentityMap;
use crate::{DecodeError, FormatAdapter};
use chrono::{DateTime, SecondsFormat, Utc};
use domain::{MetricValue, RadioMetadata, ReadingPayload, SensorReading};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct EndDeviceIds {
    pub device_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayIds {
    #[serde(default)]
    pub gateway_id: Option<String>,
}

/// 单个网关的接收记录。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RxMetadata {
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub channel_rssi: Option<f64>,
    #[serde(default)]
    pub snr: Option<f64>,
    #[serde(default)]
    pub gateway_ids: GatewayIds,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoraDataRate {
    #[serde(default)]
    pub bandwidth: Option<f64>,
    #[serde(default)]
    pub spreading_factor: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataRate {
    #[serde(default)]
    pub lora: LoraDataRate,
}

/// 发射参数。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxSettings {
    #[serde(default)]
    pub data_rate: DataRate,
    #[serde(default)]
    pub frequency: Option<FrequencyToken>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UplinkMessage {
    /// formatter 输出的 `null` 视为该指标未上报。
    #[serde(default)]
    pub decoded_payload: BTreeMap<String, Option<MetricValue>>,
    #[serde(default)]
    pub rx_metadata: Vec<RxMetadata>,
    #[serde(default)]
    pub settings: TxSettings,
}

/// TTN V3 上行 Webhook 报文（只保留用到的字段）。
#[derive(Debug, Clone, Deserialize)]
pub struct TtnUplinkMessage {
    pub end_device_ids: EndDeviceIds,
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub uplink_message: UplinkMessage,
}

/// TTN 上行适配器。
#[derive(Debug, Clone, Default)]
pub struct TtnUplinkAdapter {
    identities: DeviceIdentityMap,
}

impl TtnUplinkAdapter {
    pub fn new(identities: DeviceIdentityMap) -> Self {
        Self { identities }
    }

    /// 上行消息 → 读数；同一消息多次转换结果一致。
    pub fn to_reading(&self, message: TtnUplinkMessage) -> Result<SensorReading, DecodeError> {
        let identity = self.identities.resolve(&message.end_device_ids.device_id);
        let uplink = message.uplink_message;
        let frequency = uplink
            .settings
            .frequency
            .as_ref()
            .map(coerce_frequency)
            .transpose()?;
        let metrics = decoded_metrics(uplink.decoded_payload)?;
        let first = uplink.rx_metadata.into_iter().next().unwrap_or_default();
        let lora = uplink.settings.data_rate.lora;
        let radio = RadioMetadata {
            gateway_id: first.gateway_ids.gateway_id,
            rssi: first.rssi,
            channel_rssi: first.channel_rssi,
            snr: first.snr,
            spreading_factor: lora.spreading_factor,
            bandwidth: lora.bandwidth,
            frequency,
        };

        Ok(SensorReading {
            ship_id: Some(identity.ship_id),
            cargo_id: Some(identity.cargo_id),
            timestamp: Some(
                message
                    .received_at
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            radio: (radio != RadioMetadata::default()).then_some(radio),
            metrics,
        })
    }
}

/// 指标与读数字段同处顶层，占用保留键的指标整条拒绝，不做覆盖或丢弃。
fn decoded_metrics(
    decoded: BTreeMap<String, Option<MetricValue>>,
) -> Result<BTreeMap<String, MetricValue>, DecodeError> {
    let mut metrics = BTreeMap::new();
    for (name, value) in decoded {
        if SensorReading::RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(DecodeError::ReservedMetric(name));
        }
        if let Some(value) = value {
            metrics.insert(name, value);
        }
    }
    Ok(metrics)
}

impl FormatAdapter for TtnUplinkAdapter {
    fn kind(&self) -> &'static str {
        "ttn_uplink"
    }

    fn decode(&self, raw: &[u8]) -> Result<ReadingPayload, DecodeError> {
        let message: TtnUplinkMessage = serde_json::from_slice(raw).map_err(DecodeError::Json)?;
        debug!(
            target: "ingest.normalize",
            device_id = %message.end_device_ids.device_id,
            gateways = message.uplink_message.rx_metadata.len(),
            "ttn_uplink_decoded"
        );
        self.to_reading(message).map(ReadingPayload::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPLINK: &str = r#"{
        "end_device_ids": {"device_id": "eui-70b3d57ed0001", "application_ids": {"application_id": "reefer"}},
        "received_at": "2024-01-01T00:00:00.123456789Z",
        "uplink_message": {
            "f_port": 1,
            "decoded_payload": {"temperature": 4.5, "humidity": 61, "door": "closed", "alarm": false},
            "rx_metadata": [
                {"gateway_ids": {"gateway_id": "gw-harbor"}, "rssi": -112, "channel_rssi": -113, "snr": -3.5},
                {"gateway_ids": {"gateway_id": "gw-deck"}, "rssi": -40, "channel_rssi": -41, "snr": 9.0}
            ],
            "settings": {
                "data_rate": {"lora": {"bandwidth": 125000, "spreading_factor": 9}},
                "frequency": "868100000"
            }
        }
    }"#;

    fn adapter() -> TtnUplinkAdapter {
        TtnUplinkAdapter::new([("eui-70b3d57ed0001", "S1", "C1")].into_iter().collect())
    }

    fn decode_single(adapter: &TtnUplinkAdapter, raw: &[u8]) -> SensorReading {
        match adapter.decode(raw).expect("decode") {
            ReadingPayload::Single(reading) => reading,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn uplink_maps_to_reading() {
        let reading = decode_single(&adapter(), UPLINK.as_bytes());
        assert_eq!(reading.ship_id(), "S1");
        assert_eq!(reading.cargo_id(), "C1");
        assert_eq!(
            reading.timestamp.as_deref(),
            Some("2024-01-01T00:00:00.123456789Z")
        );
        assert_eq!(reading.metrics.get("temperature"), Some(&MetricValue::Number(4.5)));
        assert_eq!(reading.metrics.get("humidity"), Some(&MetricValue::Number(61.0)));
        assert_eq!(reading.metrics.get("door"), Some(&MetricValue::Text("closed".to_string())));
        assert_eq!(reading.metrics.get("alarm"), Some(&MetricValue::Bool(false)));
        let radio = reading.radio.expect("radio");
        assert_eq!(radio.frequency, Some(868_100_000));
        assert_eq!(radio.spreading_factor, Some(9.0));
        assert_eq!(radio.bandwidth, Some(125_000.0));
    }

    #[test]
    fn first_gateway_wins_regardless_of_signal() {
        let reading = decode_single(&adapter(), UPLINK.as_bytes());
        let radio = reading.radio.expect("radio");
        assert_eq!(radio.gateway_id.as_deref(), Some("gw-harbor"));
        assert_eq!(radio.rssi, Some(-112.0));
        assert_eq!(radio.channel_rssi, Some(-113.0));
        assert_eq!(radio.snr, Some(-3.5));
    }

    #[test]
    fn decoding_is_idempotent() {
        let adapter = adapter();
        let first = decode_single(&adapter, UPLINK.as_bytes());
        let second = decode_single(&adapter, UPLINK.as_bytes());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[test]
    fn numeric_and_string_frequency_match() {
        let numeric = UPLINK.replace(r#""868100000""#, "868100000");
        let from_text = decode_single(&adapter(), UPLINK.as_bytes());
        let from_number = decode_single(&adapter(), numeric.as_bytes());
        assert_eq!(from_text.radio, from_number.radio);
    }

    #[test]
    fn non_numeric_frequency_is_decode_error() {
        let broken = UPLINK.replace(r#""868100000""#, r#""eight""#);
        let err = adapter().decode(broken.as_bytes()).expect_err("frequency");
        assert!(matches!(err, DecodeError::Frequency(_)));
    }

    #[test]
    fn unknown_device_uses_device_id() {
        let reading = decode_single(&TtnUplinkAdapter::default(), UPLINK.as_bytes());
        assert_eq!(reading.ship_id(), "eui-70b3d57ed0001");
        assert_eq!(reading.cargo_id(), "eui-70b3d57ed0001");
    }

    #[test]
    fn missing_gateways_leave_signal_empty() {
        let raw = br#"{
            "end_device_ids": {"device_id": "eui-1"},
            "received_at": "2024-01-01T00:00:00Z",
            "uplink_message": {"decoded_payload": {"temperature": 3}}
        }"#;
        let reading = decode_single(&TtnUplinkAdapter::default(), raw);
        assert!(reading.radio.is_none());
        assert_eq!(reading.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
        let wire = serde_json::to_value(&reading).expect("serialize");
        assert!(wire.get("radio").is_none());
    }

    #[test]
    fn reserved_payload_keys_are_rejected() {
        for key in SensorReading::RESERVED_FIELDS {
            let raw = format!(
                r#"{{
                    "end_device_ids": {{"device_id": "eui-70b3d57ed0001"}},
                    "received_at": "2024-01-01T00:00:00Z",
                    "uplink_message": {{"decoded_payload": {{"temperature": 3, "{key}": "EVIL"}}}}
                }}"#
            );
            let err = adapter().decode(raw.as_bytes()).expect_err("reserved key");
            assert!(matches!(&err, DecodeError::ReservedMetric(name) if name == key));
        }
    }

    #[test]
    fn null_payload_values_are_skipped() {
        let raw = br#"{
            "end_device_ids": {"device_id": "eui-70b3d57ed0001"},
            "received_at": "2024-01-01T00:00:00Z",
            "uplink_message": {"decoded_payload": {"temperature": 3, "humidity": null}}
        }"#;
        let reading = decode_single(&adapter(), raw);
        assert_eq!(reading.metrics.len(), 1);
        assert_eq!(reading.metrics.get("temperature"), Some(&MetricValue::Number(3.0)));
        assert!(!reading.metrics.contains_key("humidity"));
    }

    #[test]
    fn malformed_uplink_is_decode_error() {
        let err = adapter()
            .decode(br#"{"end_device_ids": {}}"#)
            .expect_err("missing fields");
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(adapter().decode(b"not json").is_err());
    }

    #[test]
    fn nested_decoded_payload_is_rejected() {
        let raw = br#"{
            "end_device_ids": {"device_id": "eui-1"},
            "received_at": "2024-01-01T00:00:00Z",
            "uplink_message": {"decoded_payload": {"gps": {"lat": 1.0}}}
        }"#;
        assert!(adapter().decode(raw).is_err());
    }
}
