use clap::Parser;
use coronavstech::utils::{logger, validation::Validate};
use coronavstech::{open_registry, CliConfig, CompanyServer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置（檔案 + 命令列覆寫）
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(&config.logging.level);
    } else {
        logger::init_cli_logger_with_level(&config.logging.level);
    }

    tracing::info!("Starting coronavstech");
    tracing::debug!("Service config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let registry = Arc::new(open_registry(&config).await?);
    let server = CompanyServer::bind(&config.bind_address(), registry).await?;
    server.run().await?;

    Ok(())
}
