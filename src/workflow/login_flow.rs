//! 登录流程
//!
//! 用户输入数字 chat_id → `GET /auth/:chat_id` → 成功后保存 chat_id。
//! 之后的所有请求都带上它，直到退出登录。

use crate::api::AuthApi;
use crate::auth::{Session, TokenStore};
use crate::error::{AuthError, StoreError};
use crate::services::{MutationOutcome, Notification, Notifier};
use chrono::Duration;
use std::sync::Arc;
use tracing::info;

pub struct LoginFlow {
    api: AuthApi,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    session_ttl: Option<Duration>,
}

impl LoginFlow {
    pub fn new(api: AuthApi, store: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            store,
            notifier,
            session_ttl: None,
        }
    }

    /// 会话有效期，默认永不过期
    pub fn with_session_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// 登录
    ///
    /// # 参数
    /// - `chat_id_input`: 用户输入的 chat_id，必须是整数
    pub async fn login(&self, chat_id_input: &str) -> MutationOutcome<Session> {
        let input = chat_id_input.trim();
        let Ok(chat_id) = input.parse::<i64>() else {
            return self.reject(AuthError::InvalidChatId(input.to_string()));
        };

        let response = match self.api.login(chat_id).await {
            Ok(response) => response,
            Err(e) => {
                let message = e.user_message("登录失败，发生意外错误");
                return self.reject(AuthError::Rejected(message));
            }
        };

        let stored_id = response
            .as_ref()
            .and_then(|r| r.chat_id.clone())
            .unwrap_or_else(|| chat_id.to_string());

        let mut session = Session::new(stored_id);
        if let Some(ttl) = self.session_ttl {
            session = session.with_ttl(ttl);
        }

        if let Err(e) = self.store.set_token(session.clone()) {
            return self.reject(AuthError::Rejected(format!("保存会话失败: {}", e)));
        }

        let server_message = response.and_then(|r| r.message);
        info!("🔑 登录成功 {}", server_message.as_deref().unwrap_or_default());
        self.notifier.notify(Notification::success("登录成功"));
        MutationOutcome::Applied(session)
    }

    /// 退出登录：删除保存的 chat_id
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        self.notifier.notify(Notification::success("已退出登录"));
        Ok(())
    }

    fn reject<T>(&self, error: AuthError) -> MutationOutcome<T> {
        let message = error.to_string();
        self.notifier.notify(Notification::error(message.clone()));
        MutationOutcome::Rejected { message }
    }
}
