//! 测试列表流程
//!
//! 可以限定在某个主题下：此时创建的测试自动带上 `topic_id`，
//! 主题下的测试从主题详情里读取。

use crate::api::{TestApi, TopicApi};
use crate::error::ApiResult;
use crate::models::{RecordId, Test, TestDraft, Topic};
use crate::services::{MutationOutcome, MutationRunner};
use crate::workflow::list_flow::ListFlow;

/// 主题列表页
pub type TopicsFlow = ListFlow<Topic>;

/// 测试列表页
pub struct TestsFlow {
    inner: ListFlow<Test>,
    topics: ListFlow<Topic>,
    topic_id: Option<RecordId>,
}

impl TestsFlow {
    pub fn new(tests: TestApi, topics: TopicApi, runner: MutationRunner, limit: u32) -> Self {
        Self {
            inner: ListFlow::new(tests, runner.clone(), limit),
            topics: ListFlow::new(topics, runner, limit),
            topic_id: None,
        }
    }

    /// 限定在某个主题下
    pub fn scoped_to(mut self, topic_id: RecordId) -> Self {
        self.topic_id = Some(topic_id);
        self
    }

    /// 底层的通用列表
    pub fn list_flow(&mut self) -> &mut ListFlow<Test> {
        &mut self.inner
    }

    /// 已加载的测试
    pub fn items(&self) -> impl Iterator<Item = &Test> {
        self.inner.items()
    }

    /// 主题下的测试；未限定主题或主题不存在时为 None
    pub async fn topic_tests(&self) -> ApiResult<Option<Vec<Test>>> {
        let Some(topic_id) = self.topic_id else {
            return Ok(None);
        };
        let topic = self.topics.detail(topic_id).await?;
        Ok(topic.map(|topic| topic.tests.unwrap_or_default()))
    }

    /// 创建测试，限定主题时补上 `topic_id`
    pub async fn create(&mut self, mut draft: TestDraft) -> MutationOutcome<Option<Test>> {
        if draft.topic_id.is_none() {
            draft.topic_id = self.topic_id;
        }
        self.inner.create(&draft).await
    }
}
