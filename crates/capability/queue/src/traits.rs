//! 队列网关接口

use crate::error::QueueError;
use async_trait::async_trait;

/// 只追加的持久化队列。
///
/// 实现需自行保证并发安全：多个请求会同时调用同一实例。
#[async_trait]
pub trait QueueGateway: Send + Sync {
    /// 目标列表名称。
    fn queue_name(&self) -> &str;

    /// 追加一条消息，要么整体成功要么整体失败。
    async fn push(&self, payload: String) -> Result<(), QueueError>;
}
