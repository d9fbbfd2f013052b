mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use quiz_admin::utils::logging;
use quiz_admin::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：默认值 → 配置文件 → 环境变量
    let config = Config::load(cli.config.as_deref())?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并执行命令
    let app = App::initialize(config)?;
    cli::dispatch(&app, cli.command).await
}
