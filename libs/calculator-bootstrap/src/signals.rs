use std::fmt;

use anyhow::Result;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Signal that ended the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    CtrlC,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CtrlC => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Wait for Ctrl+C or (on Unix) SIGTERM.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> Result<ShutdownSignal> {
    let received = tokio::select! {
        result = signal::ctrl_c() => result.map(|()| ShutdownSignal::CtrlC)?,
        result = terminate() => result?,
    };

    tracing::info!(signal = %received, "shutdown signal received");
    Ok(received)
}

/// Cancel `cancel` once a shutdown signal arrives.
///
/// Falls back to plain Ctrl+C if the signal handlers cannot be installed. If
/// that fails too, the token is never cancelled and the process must be killed.
#[must_use = "abort the handle once the server has stopped"]
pub fn cancel_on_shutdown(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(wait_then_cancel(wait_for_shutdown(), cancel))
}

async fn wait_then_cancel<F>(waiter: F, cancel: CancellationToken)
where
    F: Future<Output = Result<ShutdownSignal>>,
{
    if let Err(e) = waiter.await {
        tracing::warn!(error = %e, "signal waiter failed, falling back to ctrl_c()");
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "no shutdown signal can be received");
            std::future::pending::<()>().await;
        }
    }
    cancel.cancel();
}

#[cfg(unix)]
async fn terminate() -> Result<ShutdownSignal> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(ShutdownSignal::Terminate)
}

#[cfg(not(unix))]
async fn terminate() -> Result<ShutdownSignal> {
    std::future::pending().await
}
