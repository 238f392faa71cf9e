//! Gate controller
//!
//! The single stateful decision point. Owns the track registry and the
//! `enabled` flag, and is the only caller of the audio enablement sink.
//! Events are processed one at a time to completion, so the
//! read-decide-write sequence around `enabled` can never interleave.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::events::{GateEvent, ParticipantIdentity, RoomEvent};
use crate::sink::{AudioEnablementSink, SinkError};

use super::registry::TrackRegistry;

/// Controller-level failures surfaced to the session loop
#[derive(Debug, Error)]
pub enum GateError {
    /// The sink rejected a transition; the gate keeps its prior state and
    /// will retry on the next qualifying event
    #[error("sink call failed: {0}")]
    Sink(#[from] SinkError),
}

/// Decides and applies the enablement of the target participant's audio
pub struct GateController {
    /// The one identity eligible for gating; fixed for the session
    target: ParticipantIdentity,
    /// Last value confirmed by the sink
    enabled: bool,
    /// Observed track presence for all participants
    registry: TrackRegistry,
    /// Downstream enablement toggle
    sink: Arc<dyn AudioEnablementSink>,
    /// Channel for notifying observers of actual transitions
    event_tx: broadcast::Sender<GateEvent>,
}

impl GateController {
    /// Create a controller with the gate closed
    pub fn new(
        target: ParticipantIdentity,
        sink: Arc<dyn AudioEnablementSink>,
        event_tx: broadcast::Sender<GateEvent>,
    ) -> Self {
        Self {
            target,
            enabled: false,
            registry: TrackRegistry::new(),
            sink,
            event_tx,
        }
    }

    /// Last enablement value confirmed by the sink
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The identity this session gates on
    pub fn target(&self) -> &ParticipantIdentity {
        &self.target
    }

    /// Tell the pipeline once, at session start, that audio input is off.
    ///
    /// The internal flag already starts false; this only puts the sink in a
    /// known state before any room event arrives.
    pub async fn prime(&self) -> Result<(), GateError> {
        self.sink.set_audio_input_enabled(false).await?;
        debug!(target = %self.target, "sink primed to disabled");
        Ok(())
    }

    /// Process one room event to completion.
    ///
    /// Returns `Ok(Some(enabled))` when the gate actually transitioned,
    /// `Ok(None)` when the event required no sink call. On a sink error the
    /// `enabled` flag keeps its prior value; the controller never claims a
    /// transition the sink did not confirm.
    pub async fn handle_event(&mut self, event: RoomEvent) -> Result<Option<bool>, GateError> {
        // Registry bookkeeping happens for every identity
        self.registry.apply(&event);

        // Exclusivity: only the target identity can ever move the gate
        if *event.identity() != self.target {
            debug!(event = %event, "non-target identity, gate untouched");
            return Ok(None);
        }

        // Re-derive the full desired state from the registry rather than
        // from the event delta; duplicates and reordering fall out as
        // no-ops, and a transition lost to a sink failure is reattempted
        // on the next target event.
        let desired = self.registry.has_audio(&self.target);
        if desired == self.enabled {
            debug!(event = %event, desired, "gate already reflects desired state");
            return Ok(None);
        }

        self.sink.set_audio_input_enabled(desired).await?;
        self.enabled = desired;

        info!(
            target = %self.target,
            enabled = desired,
            trigger = %event,
            "gate transition"
        );

        let notification = if desired {
            GateEvent::AudioEnabled
        } else {
            GateEvent::AudioDisabled
        };
        let _ = self.event_tx.send(notification);

        Ok(Some(desired))
    }

    /// Run the controller as the single consumer of the room event stream.
    ///
    /// Each event is settled (sink call awaited) before the next is
    /// received. Sink failures are reported and broadcast, never fatal;
    /// the loop ends when the feed side of the channel closes.
    pub async fn run(&mut self, mut event_rx: mpsc::Receiver<RoomEvent>) {
        info!(target = %self.target, "gate controller started, gate closed");

        while let Some(event) = event_rx.recv().await {
            if let Err(GateError::Sink(e)) = self.handle_event(event).await {
                warn!(error = %e, "gate transition failed, keeping prior state");
                let _ = self.event_tx.send(GateEvent::SinkFailed { desired: e.desired });
            }
        }

        info!("room event stream closed, gate controller stopped");
    }
}
