mod api;
mod middleware;

use lotview_core::{InventorySnapshot, SourceKind, SourceMode};
use lotview_source::{load_snapshot_from_config, InventoryClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = lotview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(?config, "starting lotview-server");

    let client = InventoryClient::from_config(&config)?;
    let snapshot = match load_snapshot_from_config(&client, &config).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "initial inventory load failed; serving an empty inventory until reload");
            let source = match config.source_mode {
                SourceMode::Live => SourceKind::Api,
                SourceMode::Csv => SourceKind::Csv,
            };
            InventorySnapshot::new(Vec::new(), source, Vec::new())
        }
    };

    let bind_addr = config.bind_addr;
    let app = build_app(AppState::new(snapshot, client, config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
