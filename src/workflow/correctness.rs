//! 标记正确选项
//!
//! 选中某个选项时，对该题已加载的每个选项逐个判断：选中的若不是正确
//! 则设为正确，其余当前为正确的设为不正确。这些 PUT 彼此独立、并发执行、
//! 没有事务。部分失败可能让题目有 0 个或多个正确选项，下次读取时可发现。

use crate::api::OptionApi;
use crate::models::{AnswerOption, OptionPatch, RecordId};
use futures::future::join_all;

/// 对单个选项的一次更新
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectnessChange {
    pub option_id: RecordId,
    pub is_correct: bool,
}

/// 计算需要发出的更新，已处于目标状态的选项不产生请求
pub fn plan(options: &[AnswerOption], selected: RecordId) -> Vec<CorrectnessChange> {
    options
        .iter()
        .filter_map(|option| {
            let target = option.id == selected;
            (option.is_correct != target).then_some(CorrectnessChange {
                option_id: option.id,
                is_correct: target,
            })
        })
        .collect()
}

/// 执行结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectnessReport {
    /// 成功的更新
    pub applied: Vec<CorrectnessChange>,
    /// 失败的更新及提示文本
    pub failed: Vec<(CorrectnessChange, String)>,
    /// 刷新后该题的正确选项数（刷新失败时为 None）
    pub correct_after: Option<usize>,
}

impl CorrectnessReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// 刷新后恰好一个正确选项
    pub fn is_consistent(&self) -> bool {
        self.correct_after == Some(1)
    }
}

/// 并发发出所有更新，互不等待、互不回滚
pub async fn apply(api: &OptionApi, changes: &[CorrectnessChange]) -> CorrectnessReport {
    let calls = changes.iter().map(|change| async move {
        let result = api
            .update(change.option_id, &OptionPatch::correctness(change.is_correct))
            .await;
        (*change, result)
    });

    let mut report = CorrectnessReport::default();
    for (change, result) in join_all(calls).await {
        match result {
            Ok(()) => report.applied.push(change),
            Err(e) => report.failed.push((change, e.user_message("更新选项失败"))),
        }
    }
    report
}
