//! Audio enablement sink
//!
//! The downstream pipeline (translation/transcription session) exposes one
//! toggle: whether room audio is routed into it. The gate controller is the
//! only caller. Implementations should tolerate redundant calls with the
//! same value even though the controller avoids them.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// The enablement toggle could not be applied downstream
#[derive(Debug, Error)]
#[error("audio enablement sink rejected {desired}: {reason}")]
pub struct SinkError {
    /// The value that was being applied
    pub desired: bool,
    /// Human-readable cause from the pipeline
    pub reason: String,
}

impl SinkError {
    pub fn new(desired: bool, reason: impl Into<String>) -> Self {
        Self {
            desired,
            reason: reason.into(),
        }
    }
}

/// Downstream toggle for routing audio into the processing pipeline
#[async_trait]
pub trait AudioEnablementSink: Send + Sync {
    /// Apply the enablement value; must only return `Ok` once the pipeline
    /// has actually accepted the new state.
    async fn set_audio_input_enabled(&self, enabled: bool) -> Result<(), SinkError>;
}

/// Stand-in sink that records the toggle in the log
///
/// Used when the daemon runs without a live pipeline attached, so the gate
/// logic can be exercised end to end.
pub struct LoggingSink;

#[async_trait]
impl AudioEnablementSink for LoggingSink {
    async fn set_audio_input_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        info!(enabled, "audio input enablement applied");
        Ok(())
    }
}
