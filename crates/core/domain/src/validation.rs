use serde::{Deserialize, Serialize};

/// 定位路径的一段：字段名，或批量中的元素下标。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(usize),
    Field(String),
}

impl From<&str> for LocSegment {
    fn from(value: &str) -> Self {
        LocSegment::Field(value.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(value: usize) -> Self {
        LocSegment::Index(value)
    }
}

/// 单条校验失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationErrorDetail {
    pub fn new(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec![LocSegment::from(field)],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// 在路径前追加批量下标。
    pub fn at_index(mut self, index: usize) -> Self {
        self.loc.insert(0, LocSegment::Index(index));
        self
    }
}
