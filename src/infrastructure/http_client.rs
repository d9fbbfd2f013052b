//! HTTP 客户端 - 基础设施层
//!
//! 所有出站请求的唯一出口：
//! - 基础地址在构造时解析一次
//! - 每个请求都带固定的旁路请求头
//! - 发送前读取会话，有 chat_id 就原样放进 Authorization 头
//! - 不重试、不设超时、不取消，失败原样返回给调用方

use crate::auth::TokenStore;
use crate::config::{Config, BYPASS_HEADER_NAME};
use crate::error::{ApiError, ApiResult};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// HTTP 客户端
///
/// 职责：
/// - 持有 reqwest::Client 和会话存储
/// - 不认识 Topic / Test 等业务类型
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    bypass_header_value: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    ///
    /// # 参数
    /// - `config`: 程序配置（基础地址、旁路头）
    /// - `tokens`: 会话存储
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        let base_url = config.backend_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|source| ApiError::InvalidUrl {
            url: config.backend_url.clone(),
            source,
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            bypass_header_value: config.bypass_header_value.clone(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET，空响应返回 None
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Option<T>> {
        let builder = self.request(Method::GET, endpoint)?;
        let body = self.send(builder, Method::GET, endpoint).await?;
        decode(endpoint, body)
    }

    /// GET 单条记录，404 和空响应都视为不存在
    pub async fn get_optional<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<Option<T>> {
        match self.get_json(endpoint).await {
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => Ok(None),
            other => other,
        }
    }

    /// POST JSON 请求体
    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, endpoint)?.json(body);
        let body = self.send(builder, Method::POST, endpoint).await?;
        decode(endpoint, body)
    }

    /// PUT JSON 请求体，忽略响应内容
    pub async fn put_json<B>(&self, endpoint: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, endpoint)?.json(body);
        self.send(builder, Method::PUT, endpoint).await?;
        Ok(())
    }

    /// DELETE
    pub async fn delete(&self, endpoint: &str) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, endpoint)?;
        self.send(builder, Method::DELETE, endpoint).await?;
        Ok(())
    }

    /// 构建请求：拼接地址、加旁路头、注入 Authorization
    fn request(&self, method: Method, endpoint: &str) -> ApiResult<RequestBuilder> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let url = Url::parse(&raw).map_err(|source| ApiError::InvalidUrl { url: raw, source })?;

        let mut builder = self
            .client
            .request(method, url)
            .header(BYPASS_HEADER_NAME, &self.bypass_header_value);

        match self.tokens.get_token() {
            Ok(Some(session)) => builder = builder.header(AUTHORIZATION, session.token()),
            Ok(None) => {}
            Err(e) => warn!("⚠️ 读取会话失败，本次请求不带 Authorization: {}", e),
        }

        Ok(builder)
    }

    /// 发送请求并归类响应
    ///
    /// 返回 None 表示 2xx 但响应体为空或为 JSON null
    async fn send(
        &self,
        builder: RequestBuilder,
        method: Method,
        endpoint: &str,
    ) -> ApiResult<Option<JsonValue>> {
        debug!("➡️ {} {}", method, endpoint);

        let response = builder.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        debug!("⬅️ {} {} -> {} ({} 字节)", method, endpoint, status.as_u16(), bytes.len());

        if !status.is_success() {
            return Err(ApiError::Server {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: extract_message(&bytes),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: JsonValue = serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(if value.is_null() { None } else { Some(value) })
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Option<JsonValue>) -> ApiResult<Option<T>> {
    body.map(|value| {
        serde_json::from_value(value).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    })
    .transpose()
}

/// 从错误响应体中取出 `message` 字段（字符串或字符串数组）
pub(crate) fn extract_message(body: &[u8]) -> Option<String> {
    let value: JsonValue = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        JsonValue::String(message) => Some(message.clone()),
        JsonValue::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(JsonValue::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}
