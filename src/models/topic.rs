use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::test::Test;
use super::RecordId;

/// 主题：测试的顶层分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<Test>>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 创建主题的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicDraft {
    pub name: String,
    pub description: String,
    pub active: bool,
}

/// 主题的部分更新，`None` 字段不会发送
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopicPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TopicPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.active.is_none()
    }
}
