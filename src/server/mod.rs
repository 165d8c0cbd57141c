mod error;
mod handlers;
mod routes;

pub use error::{ApiError, ApiResult};
pub use handlers::FILES_FIELD;
pub use routes::create_router;

use crate::analyzer::AiClient;
use crate::config::Config;
use crate::error::Result;
use defi_analyzer_common::{EventSink, Telemetry};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// 利用イベントをログへ出す
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, name: &str, properties: &Value) {
        info!(event = name, properties = %properties, "telemetry");
    }
}

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<AiClient>,
    pub telemetry: Telemetry<TracingSink>,
    pub static_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
}

impl AppState {
    pub fn new(client: AiClient) -> Self {
        Self {
            client: Arc::new(client),
            telemetry: Telemetry::new(TracingSink),
            static_dir: None,
            max_upload_bytes: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = AiClient::from_config(config)?;
        Ok(Self {
            static_dir: config.static_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
            ..Self::new(client)
        })
    }
}

pub struct Server {
    state: AppState,
    bind: String,
}

impl Server {
    pub fn new(state: AppState, bind: impl Into<String>) -> Self {
        Self {
            state,
            bind: bind.into(),
        }
    }

    pub async fn run(self) -> Result<()> {
        info!(
            provider = self.state.client.provider_kind().display_name(),
            model = self.state.client.model(),
            "starting analyzer server"
        );
        let router = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.bind).await?;
        info!("Server listening on http://{}", listener.local_addr()?);
        info!("  POST /api/analyze - Analyze uploaded project files");
        info!("  GET  /health      - Health check");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
