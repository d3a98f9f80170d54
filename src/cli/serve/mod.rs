//! Serve command - install, activate, then proxy requests

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::create_router;
use crate::config::AppConfig;

/// Run the proxy server.
///
/// Requests are only accepted once install has succeeded and activation has
/// completed; an install failure aborts startup.
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let state = crate::create_app_state(&config).await?;
    let lifecycle = state.lifecycle.clone();

    let installed = lifecycle
        .on_install()
        .await
        .with_context(|| format!("install of cache '{}' failed", lifecycle.version()))?;
    info!(cache = %installed.cache_name, entries = installed.entries, "install complete");

    let activated = lifecycle.on_activate().await?;
    if !activated.is_clean() {
        warn!(
            failed = activated.failed.len(),
            "some stale caches could not be deleted"
        );
    }

    let app = create_router(state);
    let addr = build_socket_addr(&config)?;
    info!("Starting proxy for {} on {}", config.upstream.origin, addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
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
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
