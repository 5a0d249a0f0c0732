//! 声明式校验规则表
//!
//! 新增受约束字段只需在 [`READING_RULES`] 中追加一行。

use domain::{MetricValue, SensorReading, ValidationErrorDetail};

/// 单个字段的约束。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// 字段必须存在。
    Required,
    /// 文本去除空白后非空。
    NotBlank,
    /// 文本为 RFC 3339 时间。
    DateTime,
    /// 值必须是数值。
    Numeric,
    /// 数值有限且落在闭区间内。
    Range { min: f64, max: f64 },
}

/// 字段及其约束（按顺序检查，遇到第一个失败即停止）。
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

/// 读数类型（与信封 `type` 对应）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    General,
}

/// 读数类型级别的指标要求。
#[derive(Debug, Clone, Copy)]
pub struct KindRule {
    pub kind: ReadingKind,
    pub min_metrics: usize,
    pub required_metrics: &'static [&'static str],
}

pub const READING_RULES: &[FieldRule] = &[
    FieldRule {
        field: "ship_id",
        constraints: &[Constraint::Required, Constraint::NotBlank],
    },
    FieldRule {
        field: "cargo_id",
        constraints: &[Constraint::Required, Constraint::NotBlank],
    },
    FieldRule {
        field: "timestamp",
        constraints: &[Constraint::Required, Constraint::DateTime],
    },
    FieldRule {
        field: "temperature",
        constraints: &[
            Constraint::Numeric,
            Constraint::Range {
                min: -100.0,
                max: 100.0,
            },
        ],
    },
    FieldRule {
        field: "humidity",
        constraints: &[
            Constraint::Numeric,
            Constraint::Range {
                min: 0.0,
                max: 100.0,
            },
        ],
    },
    FieldRule {
        field: "battery",
        constraints: &[
            Constraint::Numeric,
            Constraint::Range {
                min: 0.0,
                max: 100.0,
            },
        ],
    },
];

pub const KIND_RULES: &[KindRule] = &[KindRule {
    kind: ReadingKind::General,
    min_metrics: 1,
    required_metrics: &[],
}];

/// 字段在读数中的取值视图。
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(f64),
    Bool(bool),
}

pub(crate) fn field_value<'a>(reading: &'a SensorReading, field: &str) -> FieldValue<'a> {
    let text = |value: &'a Option<String>| match value.as_deref() {
        Some(value) => FieldValue::Text(value),
        None => FieldValue::Missing,
    };
    match field {
        "ship_id" => text(&reading.ship_id),
        "cargo_id" => text(&reading.cargo_id),
        "timestamp" => text(&reading.timestamp),
        name => match reading.metrics.get(name) {
            None => FieldValue::Missing,
            Some(MetricValue::Number(v)) => FieldValue::Number(*v),
            Some(MetricValue::Text(v)) => FieldValue::Text(v),
            Some(MetricValue::Bool(v)) => FieldValue::Bool(*v),
        },
    }
}

impl Constraint {
    pub(crate) fn check(&self, field: &str, value: FieldValue<'_>) -> Option<ValidationErrorDetail> {
        match (self, value) {
            (Constraint::Required, FieldValue::Missing) => Some(ValidationErrorDetail::new(
                field,
                "field required",
                "required",
            )),
            (_, FieldValue::Missing) | (Constraint::Required, _) => None,
            (Constraint::NotBlank, FieldValue::Text(text)) if text.trim().is_empty() => Some(
                ValidationErrorDetail::new(field, "must not be blank", "required"),
            ),
            (Constraint::NotBlank, _) => None,
            (Constraint::DateTime, FieldValue::Text(text)) => {
                match chrono::DateTime::parse_from_rfc3339(text.trim()) {
                    Ok(_) => None,
                    Err(err) => Some(ValidationErrorDetail::new(
                        field,
                        format!("must be an RFC 3339 date-time: {err}"),
                        "format",
                    )),
                }
            }
            (Constraint::DateTime, _) => Some(ValidationErrorDetail::new(
                field,
                "must be an RFC 3339 date-time",
                "format",
            )),
            (Constraint::Numeric, FieldValue::Number(_)) => None,
            (Constraint::Numeric, FieldValue::Text(_) | FieldValue::Bool(_)) => Some(
                ValidationErrorDetail::new(field, "must be a number", "number"),
            ),
            (Constraint::Range { min, max }, FieldValue::Number(v)) => {
                if !v.is_finite() {
                    Some(finite_error(field))
                } else if v < *min {
                    Some(ValidationErrorDetail::new(
                        field,
                        format!("must be greater than or equal to {min}"),
                        "min",
                    ))
                } else if v > *max {
                    Some(ValidationErrorDetail::new(
                        field,
                        format!("must be less than or equal to {max}"),
                        "max",
                    ))
                } else {
                    None
                }
            }
            (Constraint::Range { .. }, _) => None,
        }
    }
}

pub(crate) fn finite_error(field: &str) -> ValidationErrorDetail {
    ValidationErrorDetail::new(field, "must be a finite number", "finite")
}

impl KindRule {
    pub(crate) fn for_kind(kind: ReadingKind) -> Option<&'static KindRule> {
        KIND_RULES.iter().find(|rule| rule.kind == kind)
    }

    pub(crate) fn check(&self, reading: &SensorReading) -> Vec<ValidationErrorDetail> {
        let mut errors = Vec::new();
        if reading.metrics.len() < self.min_metrics {
            errors.push(ValidationErrorDetail::new(
                "metrics",
                format!("at least {} metric field(s) required", self.min_metrics),
                "min",
            ));
        }
        for name in self.required_metrics {
            if !reading.metrics.contains_key(*name) {
                errors.push(ValidationErrorDetail::new(name, "field required", "required"));
            }
        }
        errors
    }
}
