//! # Quiz Admin
//!
//! 题库管理控制台：通过 REST 后端管理主题、测试、题目和选项。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有唯一的 `HttpClient`，负责基础地址、旁路头、Authorization 头
//!
//! ### ② 接口层（API）
//! - `api/` - 每种资源每个动作一个函数，一对一映射到 REST 接口
//! - `auth/` - chat_id 会话存储与路由守卫
//!
//! ### ③ 能力层（Services）
//! - `QueryCache` - 按键缓存，并发相同读取合并
//! - `MutationRunner` - 写成功即失效缓存，失败只通知
//! - `Notifier` - 临时通知
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 列表页、测试详情页、登录
//!
//! ### ⑤ 编排层
//! - `app` - 装配各层，按路由解析要展示的内容
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, Screen};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult};
pub use infrastructure::HttpClient;
pub use services::{MutationOutcome, QueryCache};
