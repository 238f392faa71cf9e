//! Room lifecycle and gate notification events
//!
//! `RoomEvent` is the closed set of notifications accepted from the room
//! bridge; anything that fails to deserialize into it is rejected at the
//! feed boundary. `GateEvent` is what the gate controller broadcasts when
//! the enablement state actually changes.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a room participant.
///
/// Stable for the participant's connection lifetime; a rejoining
/// participant is treated as a fresh identity unless the string is
/// bit-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantIdentity(pub String);

impl ParticipantIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque identifier for a published track, as assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackSid(pub String);

impl TrackSid {
    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }
}

impl std::fmt::Display for TrackSid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a published track; only audio tracks affect the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Audio,
    Video,
}

/// Room lifecycle notifications delivered by the bridge.
///
/// Delivery is at-least-once with no ordering guarantee across distinct
/// identities; the gate controller is written to tolerate duplicates and
/// reordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A participant joined the room
    ParticipantConnected {
        identity: ParticipantIdentity,
    },

    /// A participant left the room; all of their tracks are gone
    ParticipantDisconnected {
        identity: ParticipantIdentity,
    },

    /// A participant published a track
    TrackPublished {
        identity: ParticipantIdentity,
        sid: TrackSid,
        kind: TrackKind,
    },

    /// The agent subscribed to a participant's track
    TrackSubscribed {
        identity: ParticipantIdentity,
        sid: TrackSid,
        kind: TrackKind,
    },

    /// A participant unpublished a track
    TrackUnpublished {
        identity: ParticipantIdentity,
        sid: TrackSid,
        kind: TrackKind,
    },

    /// The agent unsubscribed from a participant's track
    TrackUnsubscribed {
        identity: ParticipantIdentity,
        sid: TrackSid,
        kind: TrackKind,
    },
}

impl RoomEvent {
    /// The identity this event concerns.
    pub fn identity(&self) -> &ParticipantIdentity {
        match self {
            RoomEvent::ParticipantConnected { identity }
            | RoomEvent::ParticipantDisconnected { identity }
            | RoomEvent::TrackPublished { identity, .. }
            | RoomEvent::TrackSubscribed { identity, .. }
            | RoomEvent::TrackUnpublished { identity, .. }
            | RoomEvent::TrackUnsubscribed { identity, .. } => identity,
        }
    }
}

impl std::fmt::Display for RoomEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomEvent::ParticipantConnected { identity } => {
                write!(f, "PARTICIPANT_CONNECTED ({identity})")
            }
            RoomEvent::ParticipantDisconnected { identity } => {
                write!(f, "PARTICIPANT_DISCONNECTED ({identity})")
            }
            RoomEvent::TrackPublished { identity, sid, kind } => {
                write!(f, "TRACK_PUBLISHED ({identity}, {sid}, {kind:?})")
            }
            RoomEvent::TrackSubscribed { identity, sid, kind } => {
                write!(f, "TRACK_SUBSCRIBED ({identity}, {sid}, {kind:?})")
            }
            RoomEvent::TrackUnpublished { identity, sid, kind } => {
                write!(f, "TRACK_UNPUBLISHED ({identity}, {sid}, {kind:?})")
            }
            RoomEvent::TrackUnsubscribed { identity, sid, kind } => {
                write!(f, "TRACK_UNSUBSCRIBED ({identity}, {sid}, {kind:?})")
            }
        }
    }
}

/// Notifications broadcast by the gate controller on actual state changes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GateEvent {
    /// The target participant's audio is now routed downstream
    AudioEnabled,

    /// The target participant's audio is no longer routed downstream
    AudioDisabled,

    /// The sink rejected a transition; the gate keeps its prior state
    SinkFailed {
        /// The enablement value that could not be applied
        desired: bool,
    },
}

impl std::fmt::Display for GateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateEvent::AudioEnabled => write!(f, "AUDIO_ENABLED"),
            GateEvent::AudioDisabled => write!(f, "AUDIO_DISABLED"),
            GateEvent::SinkFailed { desired } => {
                write!(f, "SINK_FAILED (desired: {desired})")
            }
        }
    }
}
