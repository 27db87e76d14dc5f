use std::{future::IntoFuture, time::Duration};

use anyhow::{self, Error as AnyhowError};
use config::{ConfigError, LogFormat};
use server::{
    DeploymentImpl,
    deployment::{Deployment, DeploymentError},
    http,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Error)]
pub enum IssueTrackerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Other(#[from] AnyhowError),
}

fn filter_directives(level: &str) -> String {
    format!(
        "warn,server={level},db={level},issues={level},config={level},utils={level},tower_http={level}"
    )
}

fn init_tracing(log_format: LogFormat) -> Result<(), AnyhowError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(filter_directives(&log_level))?;

    let registry = tracing_subscriber::registry();
    match log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .try_init()?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IssueTrackerError> {
    dotenv::dotenv().ok();

    // The log format lives in the config, so config loading reports through a
    // temporary stderr subscriber.
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, config::load)?;

    init_tracing(config.log_format)?;

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let bind_address = config.bind_address();
    let deployment = DeploymentImpl::new(config).await?;
    let app_router = http::router(deployment.clone());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        public_dir = %deployment.config().public_dir.display(),
        "Issue tracker listening on http://{local_addr}"
    );

    let shutdown = watch_shutdown_signals();

    let server = axum::serve(listener, app_router)
        .with_graceful_shutdown(reached(shutdown.clone(), ShutdownPhase::Draining))
        .into_future();
    tokio::pin!(server);

    let serve_result = tokio::select! {
        res = &mut server => res,
        _ = reached(shutdown.clone(), ShutdownPhase::Forced) => {
            tracing::warn!("Forced exit requested while draining");
            std::process::exit(130);
        }
        _ = drain_deadline(shutdown.clone(), shutdown_timeout) => {
            tracing::warn!(?shutdown_timeout, "Requests still in flight after drain timeout, exiting");
            std::process::exit(130);
        }
    };

    serve_result?;

    if let Err(err) = deployment.db().pool.clone().close().await {
        tracing::warn!(error = %err, "Failed to close the issue store cleanly");
    }
    tracing::info!("Issue tracker stopped");

    Ok(())
}

/// Progress of a shutdown. Each signal moves one phase forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ShutdownPhase {
    Running,
    Draining,
    Forced,
}

fn watch_shutdown_signals() -> watch::Receiver<ShutdownPhase> {
    let (tx, rx) = watch::channel(ShutdownPhase::Running);

    tokio::spawn(async move {
        #[cfg(unix)]
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sig) => Some(sig),
                Err(err) => {
                    tracing::warn!(error = %err, "SIGTERM handler unavailable; only Ctrl+C stops the server");
                    None
                }
            };

        for phase in [ShutdownPhase::Draining, ShutdownPhase::Forced] {
            #[cfg(unix)]
            let received = tokio::select! {
                res = tokio::signal::ctrl_c() => res,
                _ = terminate(&mut sigterm) => Ok(()),
            };
            #[cfg(not(unix))]
            let received = tokio::signal::ctrl_c().await;

            if let Err(err) = received {
                tracing::error!(error = %err, "Failed to listen for shutdown signals");
                return;
            }
            if phase == ShutdownPhase::Draining {
                tracing::info!("Shutdown signal received, draining requests (send again to force)");
            } else {
                tracing::warn!("Second shutdown signal received");
            }
            tx.send_replace(phase);
        }
    });

    rx
}

#[cfg(unix)]
async fn terminate(sigterm: &mut Option<tokio::signal::unix::Signal>) {
    if let Some(sigterm) = sigterm
        && sigterm.recv().await.is_some()
    {
        return;
    }
    std::future::pending::<()>().await;
}

/// Resolves once the shutdown has reached `phase`; never resolves if the
/// signal watcher is gone before that.
async fn reached(mut rx: watch::Receiver<ShutdownPhase>, phase: ShutdownPhase) {
    if rx.wait_for(|current| *current >= phase).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn drain_deadline(rx: watch::Receiver<ShutdownPhase>, timeout: Duration) {
    reached(rx, ShutdownPhase::Draining).await;
    tokio::time::sleep(timeout).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directives_parse() {
        for level in ["info", "debug", "trace"] {
            assert!(EnvFilter::try_new(filter_directives(level)).is_ok());
        }
    }

    #[tokio::test]
    async fn reached_waits_for_the_requested_phase() {
        let (tx, rx) = watch::channel(ShutdownPhase::Running);
        let forced = tokio::spawn(reached(rx.clone(), ShutdownPhase::Forced));
        let draining = tokio::spawn(reached(rx, ShutdownPhase::Draining));

        tx.send_replace(ShutdownPhase::Draining);
        tokio::time::timeout(Duration::from_secs(1), draining)
            .await
            .unwrap()
            .unwrap();
        assert!(!forced.is_finished());

        tx.send_replace(ShutdownPhase::Forced);
        tokio::time::timeout(Duration::from_secs(1), forced)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn reached_returns_for_a_phase_already_passed() {
        let (_tx, rx) = watch::channel(ShutdownPhase::Forced);
        tokio::time::timeout(
            Duration::from_secs(1),
            reached(rx, ShutdownPhase::Draining),
        )
        .await
        .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn drain_deadline_waits_for_timeout_after_signal() {
        let (tx, rx) = watch::channel(ShutdownPhase::Running);
        let deadline = tokio::spawn(drain_deadline(rx, Duration::from_secs(10)));

        tx.send_replace(ShutdownPhase::Draining);
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(!deadline.is_finished());

        tokio::time::sleep(Duration::from_secs(2)).await;
        deadline.await.unwrap();
    }
}
