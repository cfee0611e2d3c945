use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 應用層記錄使用的 logger 名稱
pub const CORONA_LOGS: &str = "CORONA_LOGS";

fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "coronavstech={level},{CORONA_LOGS}={level},tower_http=info"
        ))
    })
}

pub fn init_cli_logger(verbose: bool) {
    init_cli_logger_with_level(if verbose { "debug" } else { "info" });
}

pub fn init_cli_logger_with_level(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(default_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 方便交給集中式 log 收集
        )
        .init();
}

/// 對 CORONA_LOGS 發出一筆 warning，啟動時用來確認 log 管道可用
pub fn log_something() {
    tracing::warn!(target: CORONA_LOGS, "I am logging");
}
