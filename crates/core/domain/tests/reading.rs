use domain::{
    LocSegment, MetricValue, QueuedEnvelope, RadioMetadata, ReadingPayload, SensorReading,
    ValidationErrorDetail,
};
use serde_json::{Value, json};

#[test]
fn reading_metrics_are_top_level_keys() {
    let payload = r#"{"ship_id":"S1","cargo_id":"C1","timestamp":"2024-01-01T00:00:00Z","temperature":21.5,"door":"open","powered":true}"#;
    let reading: SensorReading = serde_json::from_str(payload).expect("parse");
    assert_eq!(reading.ship_id(), "S1");
    assert_eq!(reading.cargo_id(), "C1");
    assert_eq!(reading.metrics.get("temperature"), Some(&MetricValue::Number(21.5)));
    assert_eq!(reading.metrics.get("door"), Some(&MetricValue::Text("open".to_string())));
    assert_eq!(reading.metrics.get("powered"), Some(&MetricValue::Bool(true)));
    assert!(reading.radio.is_none());
}

#[test]
fn reading_missing_identity_decodes_as_none() {
    let reading: SensorReading =
        serde_json::from_str(r#"{"ship_id":"S1","temperature":1}"#).expect("parse");
    assert!(reading.cargo_id.is_none());
    assert!(reading.timestamp.is_none());
    assert_eq!(reading.metrics.get("temperature"), Some(&MetricValue::Number(1.0)));
}

#[test]
fn reading_rejects_wrong_identity_type() {
    let result = serde_json::from_str::<SensorReading>(r#"{"ship_id":42,"cargo_id":"C1"}"#);
    assert!(result.is_err());
}

#[test]
fn reading_rejects_nested_metric() {
    let result = serde_json::from_str::<SensorReading>(
        r#"{"ship_id":"S1","cargo_id":"C1","temperature":{"value":1}}"#,
    );
    assert!(result.is_err());
}

#[test]
fn reading_serializes_radio_without_empty_fields() {
    let reading = SensorReading::new("S1", "C1", "2024-01-01T00:00:00Z").with_radio(RadioMetadata {
        gateway_id: Some("gw-1".to_string()),
        rssi: Some(-80.0),
        frequency: Some(868_000_000),
        ..RadioMetadata::default()
    });
    let value = serde_json::to_value(&reading).expect("serialize");
    assert_eq!(value["radio"]["gateway_id"], "gw-1");
    assert_eq!(value["radio"]["frequency"], 868_000_000u64);
    assert!(value["radio"].get("snr").is_none());
}

#[test]
fn envelope_wire_shape_single() {
    let reading = SensorReading::new("S1", "C1", "2024-01-01T00:00:00Z").with_metric("temperature", 21.5);
    let envelope = QueuedEnvelope::general(ReadingPayload::Single(reading));
    let value = serde_json::to_value(&envelope).expect("serialize");
    assert_eq!(value["retry_count"], 0);
    assert_eq!(value["type"], "general");
    assert_eq!(value["data"]["ship_id"], "S1");
    assert_eq!(value["data"]["temperature"], 21.5);
}

#[test]
fn envelope_wire_shape_batch() {
    let first = SensorReading::new("S1", "C1", "2024-01-01T00:00:00Z").with_metric("humidity", 40.0);
    let second = SensorReading::new("S1", "C2", "2024-01-01T00:01:00Z").with_metric("humidity", 41.0);
    let envelope = QueuedEnvelope::general(ReadingPayload::Batch(vec![first, second]));
    assert_eq!(envelope.payload.kind(), "general");
    let value = serde_json::to_value(&envelope).expect("serialize");
    let data = value["data"].as_array().expect("array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[1]["cargo_id"], "C2");
}

#[test]
fn envelope_parses_back_from_wire() {
    let reading = SensorReading::new("S1", "C1", "2024-01-01T00:00:00Z")
        .with_metric("temperature", 21.5)
        .with_metric("door", "open")
        .with_radio(RadioMetadata {
            gateway_id: Some("gw-1".to_string()),
            frequency: Some(868_000_000),
            ..RadioMetadata::default()
        });
    for payload in [
        ReadingPayload::Single(reading.clone()),
        ReadingPayload::Batch(vec![reading.clone(), reading]),
    ] {
        let envelope = QueuedEnvelope::general(payload);
        let wire = serde_json::to_string(&envelope).expect("serialize");
        let parsed: QueuedEnvelope = serde_json::from_str(&wire).expect("parse back");
        assert_eq!(parsed, envelope);
    }
}

#[test]
fn reserved_fields_cover_reading_keys() {
    let value = serde_json::to_value(
        SensorReading::new("S1", "C1", "2024-01-01T00:00:00Z").with_radio(RadioMetadata::default()),
    )
    .expect("serialize");
    let keys: Vec<_> = value.as_object().expect("object").keys().cloned().collect();
    for key in &keys {
        assert!(SensorReading::RESERVED_FIELDS.contains(&key.as_str()), "{key}");
    }
    assert_eq!(keys.len(), SensorReading::RESERVED_FIELDS.len());
}

#[test]
fn validation_detail_index_is_numeric() {
    let detail = ValidationErrorDetail::new("cargo_id", "field required", "required").at_index(1);
    assert_eq!(
        detail.loc,
        vec![LocSegment::Index(1), LocSegment::Field("cargo_id".to_string())]
    );
    let value = serde_json::to_value(&detail).expect("serialize");
    assert_eq!(
        value,
        json!({"loc": [1, "cargo_id"], "msg": "field required", "type": "required"})
    );
    assert!(matches!(value["loc"][0], Value::Number(_)));
}
