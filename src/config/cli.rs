use crate::config::toml_config::ServiceConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "coronavstech")]
#[command(about = "Tracks which tech companies are hiring and which are laying off")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, env = "CORONAVSTECH_CONFIG")]
    pub config: Option<String>,

    #[arg(long, help = "Override server.host")]
    pub host: Option<String>,

    #[arg(short, long, help = "Override server.port")]
    pub port: Option<u16>,

    #[arg(long, help = "Persist companies to this JSON file (enables the json backend)")]
    pub storage_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入配置檔（若有指定）並套用命令列覆寫值
    pub fn load(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(Path::new(path))?,
            None => ServiceConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.storage_path {
            config.storage.backend = "json".to_string();
            config.storage.path = Some(path.clone());
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}
