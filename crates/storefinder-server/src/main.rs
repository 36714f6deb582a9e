mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(storefinder_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.search.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dataset_path = &config.search.dataset_path;
    let dataset = Arc::new(storefinder_core::load_store_dataset(dataset_path)?);
    if dataset.is_empty() {
        tracing::warn!(
            path = %dataset_path.display(),
            "store dataset is empty; every search will return no results"
        );
    }

    let app = build_app(AppState {
        dataset,
        config: Arc::clone(&config),
    });

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "starting storefinder-server"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_stop())
        .await?;
    tracing::info!("storefinder-server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM under unix. A listener that cannot be
/// installed is logged and never fires, so the server keeps serving.
async fn wait_for_stop() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("ctrl-c received, draining store API"),
        () = terminate => tracing::info!("SIGTERM received, draining store API"),
    }
}
