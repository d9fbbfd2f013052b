//! 登录接口
//!
//! `GET /auth/:chat_id`，成功即视为登录，客户端不再做任何校验。

use crate::error::ApiResult;
use crate::infrastructure::HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// 登录响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_chat_id")]
    pub chat_id: Option<String>,
}

/// 登录接口
#[derive(Clone)]
pub struct AuthApi {
    http: Arc<HttpClient>,
}

impl AuthApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// 用 chat_id 登录
    pub async fn login(&self, chat_id: i64) -> ApiResult<Option<LoginResponse>> {
        debug!("登录 chat_id={}", chat_id);
        self.http.get_json(&format!("/auth/{}", chat_id)).await
    }
}

// chat_id 可能是数字也可能是字符串，统一转成字符串
fn deserialize_chat_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct ChatIdVisitor;

    impl<'de> Visitor<'de> for ChatIdVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer chat id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ChatIdVisitor)
}
