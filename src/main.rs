use anyhow::{Context, Result};
use clap::Parser;

use driving_theory_client::utils::logging;
use driving_theory_client::{App, Config, Language, Route};

/// 驾驶理论模拟考试
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 要打开的页面，如 `/`、`/sections`、`/test/full?timer=true`
    #[arg(default_value = "/")]
    route: String,

    /// 题库服务地址
    #[arg(long)]
    api_base_url: Option<String>,

    /// 显示语言（ar / en / sv）
    #[arg(long)]
    lang: Option<Language>,

    /// TOML 配置文件，环境变量会覆盖其中的值
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?.merge_env()?,
        None => Config::from_env()?,
    };
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url;
    }
    if let Some(lang) = cli.lang {
        config.language = lang;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    let route: Route = cli
        .route
        .parse()
        .with_context(|| format!("无法打开页面 {}", cli.route))?;

    // 初始化并运行应用
    App::initialize(config).await?.run(route).await?;

    Ok(())
}
