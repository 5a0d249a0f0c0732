//! 读数校验。
//!
//! 校验从不失败：返回空列表表示通过。单条读数任一失败即拒绝；
//! 批量中任一元素失败则整批拒绝，不存在部分接纳。

pub mod rules;

use domain::{MetricValue, ReadingPayload, SensorReading, ValidationErrorDetail};
use rules::{KindRule, READING_RULES, field_value, finite_error};

pub use rules::{Constraint, FieldRule, KIND_RULES, ReadingKind};

/// 按 General 类型校验单条读数。
pub fn validate(reading: &SensorReading) -> Vec<ValidationErrorDetail> {
    validate_as(reading, ReadingKind::General)
}

/// 按指定类型校验单条读数。
pub fn validate_as(reading: &SensorReading, kind: ReadingKind) -> Vec<ValidationErrorDetail> {
    let mut errors = Vec::new();
    let mut failed_fields: Vec<&str> = Vec::new();

    for rule in READING_RULES {
        let value = field_value(reading, rule.field);
        if let Some(error) = rule
            .constraints
            .iter()
            .find_map(|constraint| constraint.check(rule.field, value))
        {
            failed_fields.push(rule.field);
            errors.push(error);
        }
    }

    // 未在规则表中声明的数值指标同样不允许 NaN / 无穷。
    for (name, value) in &reading.metrics {
        if failed_fields.contains(&name.as_str()) {
            continue;
        }
        if let MetricValue::Number(v) = value {
            if !v.is_finite() {
                errors.push(finite_error(name));
            }
        }
    }

    if let Some(kind_rule) = KindRule::for_kind(kind) {
        errors.extend(kind_rule.check(reading));
    }
    errors
}

/// 校验批量读数，每条失败的路径前缀为元素下标。
pub fn validate_batch(readings: &[SensorReading]) -> Vec<ValidationErrorDetail> {
    readings
        .iter()
        .enumerate()
        .flat_map(|(index, reading)| {
            validate(reading)
                .into_iter()
                .map(move |error| error.at_index(index))
        })
        .collect()
}

/// 按负载形状分派。
pub fn validate_payload(payload: &ReadingPayload) -> Vec<ValidationErrorDetail> {
    match payload {
        ReadingPayload::Single(reading) => validate(reading),
        ReadingPayload::Batch(readings) => validate_batch(readings),
    }
}
