//! A grid/code generator with a live payments feed.
//!
//! The server produces 10x10 grids of random letters, derives a two-digit code
//! from each, and lets clients record payments against a code. Everything is
//! served over a JSON HTTP API and a WebSocket channel on which grid updates
//! and new payments are broadcast to every connected client.

use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::{error, info};

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod state;

use config::ServerConfig;
use error::Result;
use state::{AppState, ServerContext};

/// Binds the configured address and serves until Ctrl+C or SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let address = config.address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;

    let state = ServerContext::new(config);
    serve(listener, state, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
///
/// Live WebSocket clients are disconnected as soon as shutdown starts so the
/// graceful drain does not wait on them.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server running on {}", listener.local_addr()?);

    let app = interfaces::http::router(state.clone());
    let drain = async move {
        shutdown.await;
        state.shutdown();
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(drain)
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
