//! Redis 列表队列实现

use crate::error::QueueError;
use crate::traits::QueueGateway;
use ::redis::AsyncCommands;
use ::redis::aio::MultiplexedConnection;

/// Redis 队列网关
///
/// 多路复用连接可被并发克隆使用，所有请求共享一条底层连接。
pub struct RedisQueueGateway {
    connection: MultiplexedConnection,
    queue_name: String,
}

impl RedisQueueGateway {
    pub fn new(connection: MultiplexedConnection, queue_name: impl Into<String>) -> Self {
        Self {
            connection,
            queue_name: queue_name.into(),
        }
    }

    pub async fn connect(redis_url: &str, queue_name: &str) -> Result<Self, QueueError> {
        let client = ::redis::Client::open(redis_url)?;
        let connection = client.get_multiplexed_tokio_connection().await?;
        Ok(Self::new(connection, queue_name))
    }
}

#[async_trait::async_trait]
impl QueueGateway for RedisQueueGateway {
    fn queue_name(&self) -> &str {
        &self.queue_name
    }

    async fn push(&self, payload: String) -> Result<(), QueueError> {
        let mut connection = self.connection.clone();
        connection
            .rpush::<_, _, ()>(&self.queue_name, payload)
            .await?;
        Ok(())
    }
}
