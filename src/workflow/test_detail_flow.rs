//! 测试详情流程 - 流程层
//!
//! 核心职责：一套测试的题目和选项管理
//!
//! 题目和选项没有独立的读接口，页面上的数据全部来自 `GET /tests/test/:id`。
//! 每次写成功后让该键失效并整体重新读取；写失败时保留当前数据。

use crate::api::{OptionApi, QuestionApi, ResourceKind, TestApi};
use crate::error::ApiResult;
use crate::models::{
    AnswerOption, OptionDraft, OptionPatch, Question, QuestionDraft, QuestionPatch, RecordId, Test,
};
use crate::services::{
    Invalidation, MutationMessages, MutationOutcome, MutationRunner, Notification, QueryKey,
};
use crate::utils::truncate_text;
use crate::workflow::correctness::{self, CorrectnessReport};
use tracing::{info, warn};

/// 测试详情页
pub struct TestDetailFlow {
    test_id: RecordId,
    tests: TestApi,
    questions: QuestionApi,
    options: OptionApi,
    runner: MutationRunner,
    current: Option<Test>,
}

impl TestDetailFlow {
    pub fn new(
        test_id: RecordId,
        tests: TestApi,
        questions: QuestionApi,
        options: OptionApi,
        runner: MutationRunner,
    ) -> Self {
        Self {
            test_id,
            tests,
            questions,
            options,
            runner,
            current: None,
        }
    }

    /// 最近一次读取到的测试
    pub fn test(&self) -> Option<&Test> {
        self.current.as_ref()
    }

    /// 读取测试详情（走缓存）
    pub async fn load(&mut self) -> ApiResult<Option<&Test>> {
        let api = self.tests.clone();
        let test_id = self.test_id;
        let test = self
            .runner
            .cache()
            .fetch(self.key(), move || async move { api.get_by_id(test_id).await })
            .await?;
        self.current = test;
        Ok(self.current.as_ref())
    }

    /// 丢弃缓存后重新读取
    pub async fn refetch(&mut self) -> ApiResult<Option<&Test>> {
        self.runner.cache().invalidate(Invalidation::Key(self.key()));
        self.load().await
    }

    // ========== 题目 ==========

    /// 新增题目，未填分值时按 0 分
    pub async fn add_question(
        &mut self,
        text: &str,
        score: Option<f64>,
    ) -> MutationOutcome<Option<Question>> {
        if text.trim().is_empty() {
            return self.runner.reject("题目内容不能为空");
        }
        let draft = QuestionDraft {
            test_id: self.test_id,
            question: text.to_string(),
            question_score: score.unwrap_or(0.0),
        };
        info!("➕ 新增题目: {}", truncate_text(text, 40));

        let messages = MutationMessages::silent("新增题目失败");
        let outcome = self
            .runner
            .run(&messages, &self.invalidations(), self.questions.create(&draft))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 修改题目
    pub async fn update_question(
        &mut self,
        question_id: RecordId,
        patch: QuestionPatch,
    ) -> MutationOutcome<()> {
        if patch.question.as_deref().map_or(false, |q| q.trim().is_empty()) {
            return self.runner.reject("题目内容不能为空");
        }
        let messages = MutationMessages::new("题目更新成功", "更新题目失败");
        let outcome = self
            .runner
            .run(&messages, &self.invalidations(), self.questions.update(question_id, &patch))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 删除题目
    pub async fn delete_question(&mut self, question_id: RecordId) -> MutationOutcome<()> {
        let messages = MutationMessages::new("题目删除成功", "删除题目失败");
        let outcome = self
            .runner
            .run(&messages, &self.invalidations(), self.questions.delete(question_id))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    // ========== 选项 ==========

    /// 新增空白选项，文本之后再编辑
    pub async fn add_option(
        &mut self,
        question_id: RecordId,
    ) -> MutationOutcome<Option<AnswerOption>> {
        let draft = OptionDraft::blank(question_id);
        let messages = MutationMessages::silent("新增选项失败");
        let outcome = self
            .runner
            .run(&messages, &self.invalidations(), self.options.create(&draft))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 修改选项文本，空白文本在本地拒绝、不发请求
    pub async fn edit_option_text(
        &mut self,
        option_id: RecordId,
        text: &str,
    ) -> MutationOutcome<()> {
        if text.trim().is_empty() {
            return self.runner.reject("选项文本不能为空");
        }
        let patch = OptionPatch::text(text);
        let messages = MutationMessages::silent("修改选项失败");
        let outcome = self
            .runner
            .run(&messages, &self.invalidations(), self.options.update(option_id, &patch))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 删除选项
    pub async fn delete_option(&mut self, option_id: RecordId) -> MutationOutcome<()> {
        let messages = MutationMessages::new("选项删除成功", "删除选项失败");
        let outcome = self
            .runner
            .run(&messages, &self.invalidations(), self.options.delete(option_id))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 把某个选项标记为该题唯一的正确答案
    ///
    /// 对已加载的选项逐个发 PUT，并发执行、没有事务。
    /// 仅当本地校验失败或所有请求都失败时返回 `Rejected`；部分失败返回
    /// `Applied`，失败明细在报告里。
    pub async fn mark_correct(
        &mut self,
        question_id: RecordId,
        option_id: RecordId,
    ) -> MutationOutcome<CorrectnessReport> {
        if self.current.is_none() {
            if let Err(e) = self.load().await {
                return self.runner.reject(e.user_message("读取测试失败"));
            }
        }

        let Some(question) = self.current.as_ref().and_then(|t| t.question(question_id)) else {
            return self.runner.reject(format!("题目 #{} 不存在", question_id));
        };
        if !question.options().iter().any(|o| o.id == option_id) {
            return self
                .runner
                .reject(format!("选项 #{} 不属于题目 #{}", option_id, question_id));
        }

        let changes = correctness::plan(question.options(), option_id);
        if changes.is_empty() {
            return MutationOutcome::Applied(CorrectnessReport {
                correct_after: Some(question.correct_count()),
                ..Default::default()
            });
        }

        info!(
            "🎯 题目 #{} 设置正确选项 #{}，共 {} 个更新",
            question_id,
            option_id,
            changes.len()
        );
        let mut report = correctness::apply(&self.options, &changes).await;

        for (change, message) in &report.failed {
            warn!("⚠️ 选项 #{} 更新失败: {}", change.option_id, message);
            self.runner.notifier().notify(Notification::error(message.clone()));
        }

        if report.applied.is_empty() {
            let message = report
                .failed
                .first()
                .map(|(_, m)| m.clone())
                .unwrap_or_else(|| "更新选项失败".to_string());
            return MutationOutcome::Rejected { message };
        }

        match self.refetch().await {
            Ok(test) => {
                report.correct_after = test
                    .and_then(|t| t.question(question_id))
                    .map(Question::correct_count);
            }
            Err(e) => warn!("⚠️ 写入后刷新测试失败: {}", e),
        }

        if let Some(count) = report.correct_after.filter(|&count| count != 1) {
            self.runner.notifier().notify(Notification::warning(format!(
                "题目 #{} 当前有 {} 个正确选项",
                question_id, count
            )));
        }

        MutationOutcome::Applied(report)
    }

    fn key(&self) -> QueryKey {
        QueryKey::detail(ResourceKind::Test, self.test_id)
    }

    fn invalidations(&self) -> [Invalidation; 1] {
        [Invalidation::Key(self.key())]
    }

    async fn after_write<T>(&mut self, outcome: &MutationOutcome<T>) {
        if !outcome.is_applied() {
            return;
        }
        if let Err(e) = self.load().await {
            warn!("⚠️ 写入成功但刷新测试 #{} 失败: {}", self.test_id, e);
        }
    }
}
