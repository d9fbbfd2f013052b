//! 查询缓存
//!
//! 按（资源种类, 页码/ID）缓存响应。相同键的并发读取共享同一次请求；
//! 写操作不经过缓存、也不串行化。任何成功的写操作都应使相关键失效，
//! 下一次读取整体重新拉取，不在缓存里就地修改。

use crate::api::ResourceKind;
use crate::error::{ApiError, ApiResult};
use crate::models::{PaginationOptions, RecordId};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::debug;

/// 缓存键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// 分页列表中的一页
    Page {
        kind: ResourceKind,
        pagination: PaginationOptions,
    },
    /// 单条记录
    Detail { kind: ResourceKind, id: RecordId },
}

impl QueryKey {
    pub fn page(kind: ResourceKind, pagination: PaginationOptions) -> Self {
        QueryKey::Page { kind, pagination }
    }

    pub fn detail(kind: ResourceKind, id: RecordId) -> Self {
        QueryKey::Detail { kind, id }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            QueryKey::Page { kind, .. } | QueryKey::Detail { kind, .. } => *kind,
        }
    }
}

/// 失效范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Key(QueryKey),
    Kind(ResourceKind),
}

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

/// 查询缓存
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Slot>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取缓存，未命中时执行 `fetch`
    ///
    /// 失败结果不会被缓存，下一次读取会重新请求。
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ApiResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(entries.entry(key).or_default())
        };

        let mut fetch = Some(fetch);
        let pending = &mut fetch;
        let cached = slot
            .get_or_try_init(|| async move {
                debug!("缓存未命中: {:?}", key);
                let value = match pending.take() {
                    Some(fetch) => fetch().await?,
                    None => unreachable!("fetch is taken only once"),
                };
                Ok::<_, ApiError>(Arc::new(value) as Arc<dyn Any + Send + Sync>)
            })
            .await?;

        match ((**cached).downcast_ref::<T>(), fetch) {
            (Some(value), _) => Ok(value.clone()),
            // 同一个键被不同类型读取：不共享，直接请求
            (None, Some(fetch)) => fetch().await,
            (None, None) => unreachable!("a slot filled by this call holds this call's type"),
        }
    }

    /// 使缓存失效
    pub fn invalidate(&self, invalidation: Invalidation) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match invalidation {
            Invalidation::Key(key) => {
                entries.remove(&key);
            }
            Invalidation::Kind(kind) => entries.retain(|key, _| key.kind() != kind),
        }
        debug!("缓存失效: {:?}", invalidation);
    }

    /// 清空全部缓存
    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// 该键是否已有缓存值
    #[cfg(test)]
    pub(crate) fn is_cached(&self, key: &QueryKey) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .map_or(false, |slot| slot.initialized())
    }
}
