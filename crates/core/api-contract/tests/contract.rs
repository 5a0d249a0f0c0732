use api_contract::{ApiError, BatchAccepted, ErrorDetails, MetricsSnapshotDto, ReadingAccepted};
use domain::ValidationErrorDetail;
use serde_json::{Value, json};

#[test]
fn server_error_has_no_details() {
    let error = ApiError::new("Failed to queue data for ingestion");
    let value = serde_json::to_value(error).expect("serialize");
    assert_eq!(value, json!({"message": "Failed to queue data for ingestion"}));
}

#[test]
fn decode_error_details_are_text() {
    let error = ApiError::with_text("Invalid request body", "Batch cannot be empty.");
    let value = serde_json::to_value(error).expect("serialize");
    assert_eq!(value["details"], "Batch cannot be empty.");
}

#[test]
fn validation_error_details_are_array() {
    let error = ApiError::validation(vec![
        ValidationErrorDetail::new("cargo_id", "field required", "required").at_index(1),
    ]);
    let value = serde_json::to_value(error).expect("serialize");
    assert_eq!(value["message"], "Validation Error");
    assert_eq!(value["details"][0]["loc"], json!([1, "cargo_id"]));
    assert_eq!(value["details"][0]["type"], "required");
}

#[test]
fn validation_error_parses_back() {
    let payload = r#"{"message":"Validation Error","details":[{"loc":["ship_id"],"msg":"field required","type":"required"}]}"#;
    let error: ApiError = serde_json::from_str(payload).expect("parse");
    match error.details {
        Some(ErrorDetails::Validation(details)) => assert_eq!(details.len(), 1),
        other => panic!("unexpected details: {other:?}"),
    }
}

#[test]
fn acknowledgments_are_snake_case() {
    let single = serde_json::to_value(ReadingAccepted::new("S1", "C1")).expect("serialize");
    assert_eq!(
        single,
        json!({"status": "Data received and queued", "ship_id": "S1", "cargo_id": "C1"})
    );
    let batch = serde_json::to_value(BatchAccepted::new(3)).expect("serialize");
    assert_eq!(batch["count"], 3);
    assert_eq!(batch["status"], "Batch data received and queued");
}

#[test]
fn metrics_snapshot_is_camel_case() {
    let dto = MetricsSnapshotDto {
        requests_received: 1,
        readings_accepted: 1,
        decode_failures: 0,
        validation_failures: 0,
        envelope_failures: 0,
        enqueue_success: 1,
        enqueue_failure: 0,
        enqueue_latency_ms_total: 2,
        enqueue_latency_ms_count: 1,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert!(value.get("requestsReceived").is_some());
    assert!(value.get("requests_received").is_none());
    assert!(matches!(value["enqueueSuccess"], Value::Number(_)));
}
