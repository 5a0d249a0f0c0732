//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 队列后端类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueBackend {
    Redis,
    /// 仅用于本地联调，进程退出即丢失。
    Memory,
}

/// TTN 设备到船舶/货物标识的映射项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMapping {
    pub device_id: String,
    pub ship_id: String,
    pub cargo_id: String,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub redis_url: String,
    pub queue_name: String,
    pub queue_backend: QueueBackend,
    pub max_body_bytes: usize,
    pub ttn_device_map: Vec<DeviceMapping>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("INGEST_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let redis_url =
            env::var("INGEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let queue_name = read_optional("INGEST_QUEUE_NAME")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| "ingest_queue".to_string());
        if queue_name.is_empty() {
            return Err(ConfigError::Invalid(
                "INGEST_QUEUE_NAME".to_string(),
                queue_name,
            ));
        }
        let queue_backend = read_backend("INGEST_QUEUE_BACKEND")?;
        let max_body_bytes = read_usize_with_default("INGEST_MAX_BODY_BYTES", 1024 * 1024)?;
        let ttn_device_map = match read_optional("INGEST_TTN_DEVICE_MAP") {
            Some(value) => parse_device_map(&value)
                .map_err(|_| ConfigError::Invalid("INGEST_TTN_DEVICE_MAP".to_string(), value))?,
            None => Vec::new(),
        };

        Ok(Self {
            http_addr,
            redis_url,
            queue_name,
            queue_backend,
            max_body_bytes,
            ttn_device_map,
        })
    }
}

/// 解析 `device=ship:cargo,device2=ship2:cargo2` 形式的映射表。
pub fn parse_device_map(value: &str) -> Result<Vec<DeviceMapping>, ConfigError> {
    let mut items = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let invalid = || ConfigError::Invalid("device map entry".to_string(), entry.to_string());
        let (device_id, identity) = entry.split_once('=').ok_or_else(invalid)?;
        let (ship_id, cargo_id) = identity.split_once(':').ok_or_else(invalid)?;
        let (device_id, ship_id, cargo_id) = (device_id.trim(), ship_id.trim(), cargo_id.trim());
        if device_id.is_empty() || ship_id.is_empty() || cargo_id.is_empty() {
            return Err(invalid());
        }
        items.push(DeviceMapping {
            device_id: device_id.to_string(),
            ship_id: ship_id.to_string(),
            cargo_id: cargo_id.to_string(),
        });
    }
    Ok(items)
}

fn read_backend(key: &str) -> Result<QueueBackend, ConfigError> {
    match read_optional(key).map(|value| value.to_ascii_lowercase()) {
        None => Ok(QueueBackend::Redis),
        Some(value) if value == "redis" => Ok(QueueBackend::Redis),
        Some(value) if value == "memory" => Ok(QueueBackend::Memory),
        Some(value) => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
