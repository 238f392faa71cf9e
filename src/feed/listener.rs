//! Unix domain socket listener for the room bridge
//!
//! Accepts bridge connections and forwards validated room events into the
//! gate controller's channel. Multiple bridge connections all feed the one
//! single-consumer channel, so event processing stays serialized.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::events::RoomEvent;

use super::frame::{read_event, FeedError};

/// Accepts room-bridge connections and produces `RoomEvent`s
pub struct FeedListener {
    socket_path: PathBuf,
    listener: UnixListener,
    event_tx: mpsc::Sender<RoomEvent>,
    shutdown_tx: broadcast::Sender<()>,
}

impl FeedListener {
    /// Bind the feed socket, replacing any stale socket file
    pub fn bind(socket_path: &Path, event_tx: mpsc::Sender<RoomEvent>) -> Result<Self> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .context("failed to create feed socket directory")?;
        }

        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .context("failed to remove stale feed socket")?;
        }

        let listener = UnixListener::bind(socket_path)
            .context("failed to bind feed socket")?;

        // Owner-only: the bridge runs as the same user
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        info!(?socket_path, "feed listener bound");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener,
            event_tx,
            shutdown_tx,
        })
    }

    /// Accept bridge connections until shutdown
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("bridge connected");
                    let event_tx = self.event_tx.clone();
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::pump_events(stream, event_tx) => {
                                if let Err(e) = result {
                                    warn!(error = %e, "dropping bridge connection");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("bridge connection handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "feed accept error");
                }
            }
        }
    }

    /// Read frames from one bridge connection until it closes or misbehaves
    async fn pump_events(
        mut stream: UnixStream,
        event_tx: mpsc::Sender<RoomEvent>,
    ) -> Result<(), FeedError> {
        while let Some(event) = read_event(&mut stream).await? {
            debug!(event = %event, "room event received");

            if event_tx.send(event).await.is_err() {
                // Controller is gone; nothing left to feed
                debug!("event channel closed, ending bridge connection");
                return Ok(());
            }
        }

        debug!("bridge disconnected");
        Ok(())
    }

    /// Stop connection handlers and remove the socket file
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove feed socket file");
            }
        }

        info!("feed listener shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::events::{ParticipantIdentity, TrackKind, TrackSid};
    use crate::feed::write_event;
    use tokio::net::UnixStream;

    /// Unique per-test socket path under the system temp dir
    fn socket_dir(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join("audio-gate-tests")
            .join(format!("{}-{}.sock", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_events_flow_from_socket_to_channel() {
        let path = socket_dir("flow");
        let (tx, mut rx) = mpsc::channel(8);
        let listener = FeedListener::bind(&path, tx).unwrap();

        let server = tokio::spawn(async move { listener.run().await });

        let mut stream = UnixStream::connect(&path).await.unwrap();
        let event = RoomEvent::TrackSubscribed {
            identity: ParticipantIdentity::new("ysf"),
            sid: TrackSid::new("TR_a"),
            kind: TrackKind::Audio,
        };
        write_event(&mut stream, &event).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);

        server.abort();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_malformed_frame_drops_connection_only() {
        use tokio::io::AsyncWriteExt;

        let path = socket_dir("malformed");
        let (tx, mut rx) = mpsc::channel(8);
        let listener = FeedListener::bind(&path, tx).unwrap();

        let server = tokio::spawn(async move { listener.run().await });

        // First connection sends garbage and gets dropped
        let mut bad = UnixStream::connect(&path).await.unwrap();
        let garbage = br#"{"type":"room_exploded"}"#;
        bad.write_all(&(garbage.len() as u32).to_le_bytes()).await.unwrap();
        bad.write_all(garbage).await.unwrap();

        // A fresh connection still works
        let mut good = UnixStream::connect(&path).await.unwrap();
        let event = RoomEvent::ParticipantConnected {
            identity: ParticipantIdentity::new("ysf"),
        };
        write_event(&mut good, &event).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);

        server.abort();
        let _ = std::fs::remove_file(&path);
    }
}
