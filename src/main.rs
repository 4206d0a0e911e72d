use anyhow::Result;
use invoice_to_xero::orchestrator::App;
use invoice_to_xero::utils::logging;
use invoice_to_xero::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 命令行参数即待处理的发票路径，未提供时扫描配置目录
    let paths: Vec<String> = std::env::args().skip(1).collect();

    // 初始化并运行应用
    App::new(config).run(&paths).await?;

    Ok(())
}
