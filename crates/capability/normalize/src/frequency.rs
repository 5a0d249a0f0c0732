//! 频率字段的双重线上表示（数值或字符串）统一为 Hz 整数。

use crate::DecodeError;
use serde::Deserialize;

/// TTN V3 中的 `frequency` 原始取值（常见为字符串 "868000000"）。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FrequencyToken {
    Number(serde_json::Number),
    Text(String),
}

/// 将频率取值转换为 Hz。
pub fn coerce_frequency(token: &FrequencyToken) -> Result<u64, DecodeError> {
    match token {
        FrequencyToken::Number(number) => number
            .as_u64()
            .ok_or_else(|| DecodeError::Frequency(number.to_string())),
        FrequencyToken::Text(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| DecodeError::Frequency(text.clone())),
    }
}
