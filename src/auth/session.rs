//! 会话与 chat_id 存储
//!
//! chat_id 就是唯一的凭证：登录成功后以字符串形式保存，之后每个请求原样
//! 放进 Authorization 头。会话对象显式传入 HTTP 客户端，不使用全局状态。

use crate::error::StoreError;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::debug;

/// 登录会话
#[derive(Clone, Debug)]
pub struct Session {
    token: SecretString,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// 创建不过期的会话
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(chat_id.into()),
            created_at: Utc::now(),
            expires_at: None,
        }
    }

    /// 设置有效期
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expires_at = Some(self.created_at + ttl);
        self
    }

    /// 作为 Authorization 头发送的原始值
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    /// 是否已过期（没有有效期的会话永不过期）
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |expires_at| expires_at <= now)
    }
}

/// chat_id 存储
///
/// 读取时过期会话按"不存在"处理。
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Result<Option<Session>, StoreError>;
    fn set_token(&self, session: Session) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;

    /// 当前是否有有效会话
    fn is_authenticated(&self) -> bool {
        matches!(self.get_token(), Ok(Some(_)))
    }
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Result<Option<Session>, StoreError> {
        let guard = self.session.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard
            .as_ref()
            .filter(|s| !s.is_expired_at(Utc::now()))
            .cloned())
    }

    fn set_token(&self, session: Session) -> Result<(), StoreError> {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// 会话文件的磁盘格式
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    chat_id: String,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

/// 文件存储：一个 TOML 文件，核心字段是 `chat_id`
///
/// 每次读取都会重新读盘，文件不存在即视为未登录。
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn path_display(&self) -> String {
        self.path.display().to_string()
    }
}

impl TokenStore for FileTokenStore {
    fn get_token(&self) -> Result<Option<Session>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path_display(),
                    source,
                })
            }
        };

        let stored: StoredSession =
            toml::from_str(&content).map_err(|source| StoreError::Corrupted {
                path: self.path_display(),
                source,
            })?;

        if stored.chat_id.trim().is_empty() {
            return Ok(None);
        }

        let session = Session {
            token: SecretString::new(stored.chat_id),
            created_at: stored.created_at,
            expires_at: stored.expires_at,
        };

        if session.is_expired_at(Utc::now()) {
            debug!("会话已过期: {}", self.path_display());
            return Ok(None);
        }

        Ok(Some(session))
    }

    fn set_token(&self, session: Session) -> Result<(), StoreError> {
        let stored = StoredSession {
            chat_id: session.token().to_string(),
            created_at: session.created_at,
            expires_at: session.expires_at,
        };
        let content = toml::to_string(&stored)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::WriteFailed {
                path: self.path_display(),
                source,
            })?;
        }

        std::fs::write(&self.path, content).map_err(|source| StoreError::WriteFailed {
            path: self.path_display(),
            source,
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::WriteFailed {
                path: self.path_display(),
                source,
            }),
        }
    }
}
