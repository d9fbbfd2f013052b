//! 列表页流程 - 流程层
//!
//! 主题列表和测试列表共用：无限滚动读取、弹窗式增改删。
//! 每次写成功后按已加载的页数整体重新读取。

use crate::api::{Browsable, ResourceApi};
use crate::error::ApiResult;
use crate::models::{PaginationOptions, RecordId};
use crate::services::{Invalidation, MutationMessages, MutationOutcome, MutationRunner, QueryKey};
use crate::workflow::infinite_list::InfiniteList;
use tracing::{info, warn};

/// 列表页
pub struct ListFlow<R: Browsable> {
    api: ResourceApi<R>,
    runner: MutationRunner,
    list: InfiniteList<R>,
}

impl<R: Browsable> ListFlow<R> {
    pub fn new(api: ResourceApi<R>, runner: MutationRunner, limit: u32) -> Self {
        Self {
            api,
            runner,
            list: InfiniteList::new(limit),
        }
    }

    pub fn list(&self) -> &InfiniteList<R> {
        &self.list
    }

    pub fn items(&self) -> impl Iterator<Item = &R> {
        self.list.items()
    }

    /// 从第一页重新开始
    pub async fn load_first_page(&mut self) -> ApiResult<()> {
        self.list.reset();
        self.load_more().await.map(|_| ())
    }

    /// 加载下一页，没有下一页时返回 false
    pub async fn load_more(&mut self) -> ApiResult<bool> {
        let Some(page) = self.list.next_page_param() else {
            return Ok(false);
        };
        let pagination = PaginationOptions::new(page, self.list.limit());
        let api = self.api.clone();

        let result = self
            .runner
            .cache()
            .fetch(QueryKey::page(R::KIND, pagination), move || async move {
                api.list(pagination).await
            })
            .await?;

        self.list.push(result);
        Ok(true)
    }

    /// 加载全部剩余页
    pub async fn load_all(&mut self) -> ApiResult<()> {
        while self.load_more().await? {}
        Ok(())
    }

    /// 按原先已加载的页数整体重新读取
    pub async fn refetch(&mut self) -> ApiResult<()> {
        let loaded = self.list.reset().max(1);
        for _ in 0..loaded {
            if !self.load_more().await? {
                break;
            }
        }
        Ok(())
    }

    /// 单条详情（走缓存）
    pub async fn detail(&self, id: RecordId) -> ApiResult<Option<R>> {
        let api = self.api.clone();
        self.runner
            .cache()
            .fetch(QueryKey::detail(R::KIND, id), move || async move {
                api.get_by_id(id).await
            })
            .await
    }

    /// 创建
    pub async fn create(&mut self, draft: &R::Draft) -> MutationOutcome<Option<R>> {
        let messages = MutationMessages::new(
            format!("{}创建成功", R::LABEL),
            format!("创建{}失败", R::LABEL),
        );
        let outcome = self
            .runner
            .run(&messages, &Self::invalidations(), self.api.create(draft))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 部分更新
    pub async fn update(&mut self, id: RecordId, patch: &R::Patch) -> MutationOutcome<()> {
        let messages = MutationMessages::new(
            format!("{}更新成功", R::LABEL),
            format!("更新{}失败", R::LABEL),
        );
        let outcome = self
            .runner
            .run(&messages, &Self::invalidations(), self.api.update(id, patch))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    /// 删除
    pub async fn delete(&mut self, id: RecordId) -> MutationOutcome<()> {
        let messages = MutationMessages::new(
            format!("{}删除成功", R::LABEL),
            format!("删除{}失败", R::LABEL),
        );
        let outcome = self
            .runner
            .run(&messages, &Self::invalidations(), self.api.delete(id))
            .await;
        self.after_write(&outcome).await;
        outcome
    }

    fn invalidations() -> Vec<Invalidation> {
        std::iter::once(R::KIND)
            .chain(R::DEPENDENTS.iter().copied())
            .map(Invalidation::Kind)
            .collect()
    }

    async fn after_write<T>(&mut self, outcome: &MutationOutcome<T>) {
        if !outcome.is_applied() || self.list.loaded_pages() == 0 {
            return;
        }
        match self.refetch().await {
            Ok(()) => info!("🔄 {}列表已刷新 ({} 条)", R::LABEL, self.list.items().count()),
            Err(e) => warn!("⚠️ 写入成功但刷新{}列表失败: {}", R::LABEL, e),
        }
    }
}
