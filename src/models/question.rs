use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::option::AnswerOption;
use super::RecordId;

/// 题目：测试中的一道题，带分值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: RecordId,
    pub test_id: RecordId,
    pub question: String,
    #[serde(default)]
    pub question_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Question {
    /// 已加载的选项
    pub fn options(&self) -> &[AnswerOption] {
        self.options.as_deref().unwrap_or_default()
    }

    /// 标记为正确的选项数量
    pub fn correct_count(&self) -> usize {
        self.options().iter().filter(|o| o.is_correct).count()
    }
}

/// 创建题目的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDraft {
    pub test_id: RecordId,
    pub question: String,
    pub question_score: f64,
}

/// 题目的部分更新
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_score: Option<f64>,
}
