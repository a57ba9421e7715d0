//! Signal handling and the bounded drain that follows it.

use std::{future::Future, time::Duration};

use tokio::sync::Notify;

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// The server returned on its own, either before a signal or while draining.
    Completed,
    /// The grace period ran out with requests still in flight.
    TimedOut,
}

/// Drive `server` until `shutdown` resolves, then wake it through `stop` and
/// allow at most `grace` for it to finish.
///
/// `server` is expected to begin its graceful shutdown when `stop` is notified.
///
/// # Errors
///
/// Returns the server's own I/O error if it fails before or during the drain.
pub async fn drain_on_shutdown<F, S>(
    server: F,
    shutdown: S,
    stop: &Notify,
    grace: Duration,
) -> std::io::Result<Drain>
where
    F: Future<Output = std::io::Result<()>>,
    S: Future<Output = ()>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map(|()| Drain::Completed),
        () = shutdown => {}
    }

    stop.notify_one();
    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map(|()| Drain::Completed),
        Err(_) => Ok(Drain::TimedOut),
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
