//! Server lifecycle: bind, serve, graceful shutdown

use crate::errors::{HttpError, HttpResult};
use axum::Router;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Bind `addr` and serve until Ctrl+C or SIGTERM
pub async fn start_server(
    addr: SocketAddr,
    router: Router,
    shutdown_timeout: Duration,
) -> HttpResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| HttpError::startup(format!("Failed to bind to {}: {}", addr, e)))?;

    let local = listener
        .local_addr()
        .map_err(|e| HttpError::startup(format!("Failed to read local address: {}", e)))?;
    info!("Server listening on {}", local);

    serve_with_shutdown(listener, router, shutdown_signal(), shutdown_timeout).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// In-flight requests get `drain_timeout` to finish once shutdown starts;
/// whatever is still running after that is dropped.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> HttpResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (draining_tx, mut draining_rx) = watch::channel(false);

    let server = axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = draining_tx.send(true);
        })
        .into_future();

    let deadline = async move {
        if draining_rx.changed().await.is_err() {
            // sender dropped without a shutdown; the server is already done
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(drain_timeout).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| HttpError::internal(format!("Server error: {}", e)))?;
            info!("Server stopped");
        }
        _ = deadline => {
            warn!("Graceful shutdown timed out after {:?}, dropping open connections", drain_timeout);
        }
    }

    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down gracefully...");
        },
    }
}
