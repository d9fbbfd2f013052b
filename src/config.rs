use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 隧道代理要求的固定旁路请求头
pub const BYPASS_HEADER_NAME: &str = "ngrok-skip-browser-warning";

/// `/:id` 详情路由解析成哪类资源（随部署而定）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailVariant {
    Topic,
    Test,
}

impl FromStr for DetailVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "topic" => Ok(DetailVariant::Topic),
            "test" => Ok(DetailVariant::Test),
            other => Err(other.to_string()),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端基础地址
    pub backend_url: String,
    /// 旁路请求头的值
    pub bypass_header_value: String,
    /// 会话文件路径（保存 chat_id）
    pub session_file: PathBuf,
    /// 列表每页条数
    pub page_limit: u32,
    /// 详情路由的解析方式
    pub detail_variant: DetailVariant,
    /// 会话有效期（小时），None 表示永不过期
    pub session_ttl_hours: Option<i64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3000".to_string(),
            bypass_header_value: "69420".to_string(),
            session_file: PathBuf::from(".quiz-admin/session.toml"),
            page_limit: 10,
            detail_variant: DetailVariant::Test,
            session_ttl_hours: None,
            verbose_logging: false,
        }
    }
}

/// 配置文件中的可选字段，未出现的字段保持默认值
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    backend_url: Option<String>,
    bypass_header_value: Option<String>,
    session_file: Option<PathBuf>,
    page_limit: Option<u32>,
    detail_variant: Option<DetailVariant>,
    session_ttl_hours: Option<i64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 默认值 + 配置文件 + 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env()
    }

    /// 从 TOML 文件读取配置
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            backend_url: file.backend_url.unwrap_or(default.backend_url),
            bypass_header_value: file.bypass_header_value.unwrap_or(default.bypass_header_value),
            session_file: file.session_file.unwrap_or(default.session_file),
            page_limit: file.page_limit.unwrap_or(default.page_limit),
            detail_variant: file.detail_variant.unwrap_or(default.detail_variant),
            session_ttl_hours: file.session_ttl_hours.or(default.session_ttl_hours),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 用环境变量覆盖当前值
    pub fn with_env(self) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: std::env::var("QUIZ_BACKEND_URL")
                .or_else(|_| std::env::var("VITE_BACKEND_URL"))
                .unwrap_or(self.backend_url),
            bypass_header_value: std::env::var("QUIZ_BYPASS_HEADER")
                .unwrap_or(self.bypass_header_value),
            session_file: std::env::var("QUIZ_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(self.session_file),
            page_limit: parse_env("QUIZ_PAGE_LIMIT", "u32")?.unwrap_or(self.page_limit),
            detail_variant: parse_env("QUIZ_DETAIL_VARIANT", "topic|test")?
                .unwrap_or(self.detail_variant),
            session_ttl_hours: parse_env("QUIZ_SESSION_TTL_HOURS", "i64")?
                .or(self.session_ttl_hours),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
        })
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
