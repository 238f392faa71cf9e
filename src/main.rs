//! audio-gate-daemon: participant-scoped audio input gating
//!
//! Sits between a real-time room bridge and a downstream audio pipeline
//! (translation/transcription agent) and decides, per room event, whether
//! the one configured target participant's audio is routed downstream:
//! - Room event feed over a Unix domain socket (length-prefixed JSON)
//! - Track registry projecting per-participant audio presence
//! - Gate controller issuing at most one sink toggle per state change
//! - All other participants permanently excluded from the pipeline

mod config;
mod events;
mod feed;
mod gate;
mod lifecycle;
mod sink;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::events::GateEvent;
use crate::feed::FeedListener;
use crate::gate::GateController;
use crate::lifecycle::wait_for_shutdown;
use crate::sink::LoggingSink;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "audio-gate-daemon starting"
    );

    // Load configuration
    let config = Config::load()?;
    config.ensure_dirs()?;
    info!(
        target = %config.target_identity,
        ?config.socket_path,
        "configuration loaded"
    );

    // Create channels for inter-component communication
    // Feed listener -> gate controller (single consumer, serializes events)
    let (room_tx, room_rx) = mpsc::channel(64);
    // Gate controller -> observers
    let (gate_tx, _gate_rx) = broadcast::channel::<GateEvent>(64);

    // The downstream pipeline attaches here; without one, transitions are
    // applied to the logging stand-in
    let sink = Arc::new(LoggingSink);

    // Create the gate controller and put the sink in a known state
    let mut controller = GateController::new(config.target_identity.clone(), sink, gate_tx.clone());
    if let Err(e) = controller.prime().await {
        warn!(error = %e, "could not prime sink to disabled, continuing");
    }

    // Bind the room event feed
    let listener = FeedListener::bind(&config.socket_path, room_tx)?;

    // Subscribe to gate events for observability
    let mut gate_event_rx = gate_tx.subscribe();

    info!("daemon initialized, entering main loop");

    // Main event loop
    tokio::select! {
        // Run the gate controller (processes room events)
        _ = controller.run(room_rx) => {
            info!("gate controller exited");
        }

        // Run the feed listener (accepts bridge connections)
        result = listener.run() => {
            if let Err(e) = result {
                error!(?e, "feed listener error");
            }
        }

        // Log gate transitions as they are confirmed
        _ = async {
            loop {
                match gate_event_rx.recv().await {
                    Ok(event) => {
                        info!(event = %event, "gate event");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "gate event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        } => {
            info!("gate event observer exited");
        }

        // Wait for shutdown signal
        cause = wait_for_shutdown() => {
            match cause {
                Ok(cause) => info!(%cause, "shutdown signal received"),
                Err(e) => error!(?e, "signal handler failed"),
            }
        }
    }

    // Cleanup
    info!("shutting down...");

    listener.shutdown().await;

    info!("audio-gate-daemon stopped");

    Ok(())
}
