//! 写操作编排
//!
//! 统一模式：发起写操作 → 成功则让相关缓存失效并通知，调用方随后整体重新读取；
//! 失败则通知（优先使用服务端 message），缓存和调用方状态都不动，
//! 用户的输入保留，可以手动重试。写操作的响应不被当作写后的服务端状态。

use crate::error::ApiResult;
use crate::services::notifier::{Notification, Notifier};
use crate::services::query_cache::{Invalidation, QueryCache};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// 写操作结果
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    /// 已生效，调用方应关闭表单并重新读取
    Applied(T),
    /// 被拒绝，调用方保持表单打开
    Rejected { message: String },
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            MutationOutcome::Applied(value) => Some(value),
            MutationOutcome::Rejected { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&str> {
        match self {
            MutationOutcome::Applied(_) => None,
            MutationOutcome::Rejected { message } => Some(message),
        }
    }
}

/// 通知文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationMessages {
    /// 成功提示，None 表示静默
    pub success: Option<String>,
    /// 服务端没有给出 message 时的兜底文本
    pub failure: String,
}

impl MutationMessages {
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            success: Some(success.into()),
            failure: failure.into(),
        }
    }

    pub fn silent(failure: impl Into<String>) -> Self {
        Self {
            success: None,
            failure: failure.into(),
        }
    }
}

/// 写操作执行器
#[derive(Clone)]
pub struct MutationRunner {
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
}

impl MutationRunner {
    pub fn new(cache: Arc<QueryCache>, notifier: Arc<dyn Notifier>) -> Self {
        Self { cache, notifier }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// 执行写操作
    ///
    /// # 参数
    /// - `messages`: 成功/失败提示
    /// - `invalidations`: 成功后需要失效的缓存
    /// - `mutation`: 写操作本身
    pub async fn run<T, Fut>(
        &self,
        messages: &MutationMessages,
        invalidations: &[Invalidation],
        mutation: Fut,
    ) -> MutationOutcome<T>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        match mutation.await {
            Ok(value) => {
                for invalidation in invalidations {
                    self.cache.invalidate(*invalidation);
                }
                if let Some(success) = &messages.success {
                    self.notifier.notify(Notification::success(success.as_str()));
                }
                MutationOutcome::Applied(value)
            }
            Err(e) => {
                debug!("写操作失败: {}", e);
                let message = e.user_message(&messages.failure);
                self.notifier.notify(Notification::error(message.clone()));
                MutationOutcome::Rejected { message }
            }
        }
    }

    /// 本地校验失败：不发请求，只通知
    pub fn reject<T>(&self, message: impl Into<String>) -> MutationOutcome<T> {
        let message = message.into();
        self.notifier.notify(Notification::error(message.clone()));
        MutationOutcome::Rejected { message }
    }
}
