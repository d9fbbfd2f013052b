//! 错误类型
//!
//! 所有失败都是局部、可由用户重试的，不存在致命错误。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 认证错误
    #[error("认证错误: {0}")]
    Auth(#[from] AuthError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 会话存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络/传输层失败
    #[error("API请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回 4xx/5xx
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    Server {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应体无法解析
    #[error("JSON解析失败 ({endpoint}): {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 基础地址非法
    #[error("无效的后端地址 {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    /// 服务端给出的 message（如果有）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP 状态码（仅服务端错误）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 用于通知用户的文本：优先使用服务端 message，否则使用兜底文本
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 未登录（或会话已过期）
    #[error("未登录，请先执行 login")]
    NotAuthenticated,
    /// chat_id 不是数字
    #[error("无效的 chat_id: {0}")]
    InvalidChatId(String),
    /// 登录被拒绝，内容即提示给用户的文本
    #[error("{0}")]
    Rejected(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 会话存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("读取会话文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入会话文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("会话文件格式错误 ({path}): {source}")]
    Corrupted {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("会话序列化失败: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// API 调用结果类型
pub type ApiResult<T> = Result<T, ApiError>;
