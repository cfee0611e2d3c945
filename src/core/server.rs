use crate::adapters::http::build_router;
use crate::adapters::storage::{JsonFileStore, MemoryStore};
use crate::config::toml_config::ServiceConfig;
use crate::core::registry::{CompanyRegistry, RegistryRules};
use crate::domain::ports::CompanyStore;
use crate::utils::error::{CoronaError, Result};
use crate::utils::logger;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 依配置建立 store 並載入 registry
pub async fn open_registry(config: &ServiceConfig) -> Result<CompanyRegistry> {
    let store: Box<dyn CompanyStore> = match (config.storage.backend.as_str(), &config.storage.path) {
        ("json", Some(path)) => Box::new(JsonFileStore::new(path)),
        ("json", None) => {
            return Err(CoronaError::MissingConfigError {
                field: "storage.path".to_string(),
            })
        }
        _ => Box::new(MemoryStore::new()),
    };

    CompanyRegistry::open(store, RegistryRules::from_settings(config)).await
}

pub struct CompanyServer {
    listener: TcpListener,
    router: Router,
}

impl CompanyServer {
    pub async fn bind(addr: &str, registry: Arc<CompanyRegistry>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: build_router(registry),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 執行到收到 Ctrl-C / SIGTERM 為止
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        tracing::info!("🚀 Serving companies API on http://{}", addr);
        logger::log_something();

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
