use ingest_queue::{InMemoryQueueGateway, QueueError, QueueGateway};
use std::sync::Arc;

#[tokio::test]
async fn push_appends_in_order() {
    let gateway = InMemoryQueueGateway::new("ingest_queue");
    assert!(gateway.is_empty());
    gateway.push("first".to_string()).await.expect("push");
    gateway.push("second".to_string()).await.expect("push");
    assert_eq!(gateway.queue_name(), "ingest_queue");
    assert_eq!(gateway.entries(), vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn concurrent_pushes_are_all_kept() {
    let gateway = Arc::new(InMemoryQueueGateway::new("ingest_queue"));
    let mut tasks = Vec::new();
    for index in 0..16 {
        let gateway = gateway.clone();
        tasks.push(tokio::spawn(async move {
            gateway.push(format!("entry-{index}")).await
        }));
    }
    for task in tasks {
        task.await.expect("join").expect("push");
    }
    assert_eq!(gateway.len(), 16);
}

#[test]
fn queue_error_displays_message() {
    let err = QueueError::new("connection refused");
    assert_eq!(err.to_string(), "connection refused");
}
