//! 通用资源接口
//!
//! | 资源 | 列表 | 详情 | 创建 | 更新 | 删除 |
//! |---|---|---|---|---|---|
//! | Topic | GET /tests/topic?page&limit | GET /tests/topic/:id | POST | PUT /:id | DELETE /:id |
//! | Test | GET /tests/test?page&limit | GET /tests/test/:id | POST | PUT /:id | DELETE /:id |
//! | Question | — | — | POST /tests/question | PUT /:id | DELETE /:id |
//! | Option | — | — | POST /tests/option | PUT /:id | DELETE /:id |
//!
//! 题目和选项没有独立的读接口，只能随所属测试的详情一起返回。

use crate::error::ApiResult;
use crate::infrastructure::HttpClient;
use crate::models::{
    AnswerOption, OptionDraft, OptionPatch, PageResult, PaginationOptions, Question, QuestionDraft,
    QuestionPatch, RecordId, Test, TestDraft, TestPatch, Topic, TopicDraft, TopicPatch,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 可列表/可按 ID 读取的资源种类（用作缓存键）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Topic,
    Test,
}

/// 后端资源：固定路径 + 创建/更新请求体类型
pub trait Resource: DeserializeOwned + Send + 'static {
    /// 资源路径（不含 ID）
    const PATH: &'static str;
    /// 用于日志的名称
    const LABEL: &'static str;

    type Draft: Serialize + Send + Sync;
    type Patch: Serialize + Send + Sync;
}

/// 带列表和详情接口的资源
pub trait Browsable: Resource + Clone + Sync {
    const KIND: ResourceKind;
    /// 内嵌了本资源的其他资源，本资源写入后它们的缓存也要失效
    const DEPENDENTS: &'static [ResourceKind];
}

impl Resource for Topic {
    const PATH: &'static str = "/tests/topic";
    const LABEL: &'static str = "主题";
    type Draft = TopicDraft;
    type Patch = TopicPatch;
}

impl Browsable for Topic {
    const KIND: ResourceKind = ResourceKind::Topic;
    const DEPENDENTS: &'static [ResourceKind] = &[ResourceKind::Test];
}

impl Resource for Test {
    const PATH: &'static str = "/tests/test";
    const LABEL: &'static str = "测试";
    type Draft = TestDraft;
    type Patch = TestPatch;
}

impl Browsable for Test {
    const KIND: ResourceKind = ResourceKind::Test;
    const DEPENDENTS: &'static [ResourceKind] = &[ResourceKind::Topic];
}

impl Resource for Question {
    const PATH: &'static str = "/tests/question";
    const LABEL: &'static str = "题目";
    type Draft = QuestionDraft;
    type Patch = QuestionPatch;
}

impl Resource for AnswerOption {
    const PATH: &'static str = "/tests/option";
    const LABEL: &'static str = "选项";
    type Draft = OptionDraft;
    type Patch = OptionPatch;
}

/// 单个资源的增删改查
pub struct ResourceApi<R> {
    http: Arc<HttpClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceApi<R> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceApi<R> {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            _resource: PhantomData,
        }
    }

    fn item_path(id: RecordId) -> String {
        format!("{}/{}", R::PATH, id)
    }

    /// 创建，服务端返回空响应时为 None
    pub async fn create(&self, draft: &R::Draft) -> ApiResult<Option<R>> {
        debug!("创建{}", R::LABEL);
        self.http.post_json(R::PATH, draft).await
    }

    /// 部分更新：未设置的字段不会发送，服务端保持原值
    pub async fn update(&self, id: RecordId, patch: &R::Patch) -> ApiResult<()> {
        debug!("更新{} #{}", R::LABEL, id);
        self.http.put_json(&Self::item_path(id), patch).await
    }

    pub async fn delete(&self, id: RecordId) -> ApiResult<()> {
        debug!("删除{} #{}", R::LABEL, id);
        self.http.delete(&Self::item_path(id)).await
    }
}

impl<R: Browsable> ResourceApi<R> {
    /// 分页列表
    ///
    /// 服务端返回空响应时得到空页（`current_page` 等于请求页码），而不是错误。
    pub async fn list(&self, pagination: PaginationOptions) -> ApiResult<PageResult<R>> {
        let endpoint = format!(
            "{}?page={}&limit={}",
            R::PATH,
            pagination.page,
            pagination.limit
        );
        let page = self.http.get_json(&endpoint).await?;
        Ok(page.unwrap_or_else(|| PageResult::empty(pagination.page)))
    }

    /// 按 ID 读取，不存在时为 None
    pub async fn get_by_id(&self, id: RecordId) -> ApiResult<Option<R>> {
        self.http.get_optional(&Self::item_path(id)).await
    }
}
