use crate::config::ServerConfig;
use crate::session::SessionCoordinator;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

/// Starts the session coordinator and returns the transport that feeds it.
///
/// A `command_buffer` of 0 is treated as 1.
pub fn start_session(command_buffer: usize) -> SignalingService {
    let (cmd_tx, cmd_rx) = mpsc::channel(command_buffer.max(1));
    let signaling = SignalingService::new(cmd_tx);

    let coordinator = SessionCoordinator::new(Arc::new(signaling.clone()));
    tokio::spawn(coordinator.run(cmd_rx));

    signaling
}

/// `/ws` is the signaling socket; everything else falls through to static files.
pub fn router(signaling: SignalingService, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new().route("/ws", get(ws_handler));
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors).with_state(signaling)
}

pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = config.socket_addr();
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))
}

/// Serves until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let signaling = start_session(config.command_buffer);
    let app = router(signaling, config.static_dir.as_deref());

    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}
