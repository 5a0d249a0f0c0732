//! # 接入队列网关
//!
//! 流水线唯一的写出口：把序列化好的信封追加到一个具名的持久化列表。
//!
//! - [`traits`]：`QueueGateway` 接口
//! - [`error`]：队列错误类型
//! - [`redis`]：Redis 列表实现（RPUSH，共享多路复用连接）
//! - [`in_memory`]：内存实现（用于测试和本地联调）
//!
//! 网关实例在启动时显式构造并注入流水线，不使用进程级单例。

pub mod error;
pub mod in_memory;
pub mod redis;
pub mod traits;

pub use error::QueueError;
pub use in_memory::InMemoryQueueGateway;
pub use self::redis::RedisQueueGateway;
pub use traits::QueueGateway;
