use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// 选项：题目的一个备选答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: RecordId,
    pub question_id: RecordId,
    #[serde(default)]
    pub option: String,
    #[serde(rename = "isCorrect", default)]
    pub is_correct: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// 创建选项的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDraft {
    pub question_id: RecordId,
    pub option: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

impl OptionDraft {
    /// 新增的空白选项（先创建，再由用户编辑文本）
    pub fn blank(question_id: RecordId) -> Self {
        Self {
            question_id,
            option: String::new(),
            is_correct: false,
        }
    }
}

/// 选项的部分更新
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(rename = "isCorrect", skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl OptionPatch {
    pub fn correctness(is_correct: bool) -> Self {
        Self {
            is_correct: Some(is_correct),
            ..Default::default()
        }
    }

    pub fn text(option: impl Into<String>) -> Self {
        Self {
            option: Some(option.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn correctness_patch_uses_camel_case_flag() {
        assert_eq!(
            serde_json::to_value(OptionPatch::correctness(true)).unwrap(),
            json!({ "isCorrect": true })
        );
    }

    #[test]
    fn blank_draft_is_incorrect_and_empty() {
        assert_eq!(
            serde_json::to_value(OptionDraft::blank(7)).unwrap(),
            json!({ "question_id": 7, "option": "", "isCorrect": false })
        );
    }
}
