//! 队列内存实现
//!
//! 仅用于本地测试和联调。

use crate::error::QueueError;
use crate::traits::QueueGateway;
use std::sync::RwLock;

/// 内存队列网关
pub struct InMemoryQueueGateway {
    queue_name: String,
    entries: RwLock<Vec<String>>,
}

impl InMemoryQueueGateway {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// 已追加的消息（按追加顺序）。
    pub fn entries(&self) -> Vec<String> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl QueueGateway for InMemoryQueueGateway {
    fn queue_name(&self) -> &str {
        &self.queue_name
    }

    async fn push(&self, payload: String) -> Result<(), QueueError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| QueueError::new("lock failed"))?;
        entries.push(payload);
        Ok(())
    }
}
