//! Signal handling for graceful shutdown

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};

/// Which signal ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCause {
    Sigterm,
    Sigint,
}

impl std::fmt::Display for ShutdownCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownCause::Sigterm => write!(f, "SIGTERM"),
            ShutdownCause::Sigint => write!(f, "SIGINT"),
        }
    }
}

/// Wait for SIGTERM or SIGINT and report which one arrived.
///
/// The caller selects over this alongside the component futures; any
/// in-flight gate transition is settled by the controller loop before the
/// task is dropped.
pub async fn wait_for_shutdown() -> Result<ShutdownCause> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("failed to register SIGINT handler")?;

    tokio::select! {
        _ = sigterm.recv() => Ok(ShutdownCause::Sigterm),
        _ = sigint.recv() => Ok(ShutdownCause::Sigint),
    }
}
