//! 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"发请求"的能力

pub mod http_client;

pub use http_client::HttpClient;
