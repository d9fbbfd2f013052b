/// 日志工具模块
///
/// 负责初始化 tracing 订阅者，并提供日志格式化的辅助函数
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 过滤规则依次读取 `RUST_LOG`、`LOG_LEVEL`，都不存在时按 `verbose` 选择
/// `debug` 或 `info`。`LOG_FORMAT=json` 时输出 JSON 结构化日志。
pub fn init(verbose: bool) {
    let default_level = if verbose { "quiz_admin=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose);

    let result = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    };
    // 已经初始化过（例如测试中）时沿用现有订阅者
    if let Err(e) = result {
        debug!("日志已初始化，跳过: {}", e);
    }
}

/// 记录程序启动信息
///
/// # 参数
/// - `backend_url`: 后端地址
/// - `authenticated`: 是否已有登录会话
pub fn log_startup(backend_url: &str, authenticated: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 题库管理控制台启动");
    info!("🌐 后端地址: {}", backend_url);
    info!("🔑 登录状态: {}", if authenticated { "已登录" } else { "未登录" });
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
