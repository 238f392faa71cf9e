//! Participant track registry
//!
//! A last-write-wins projection of observed track state: per participant
//! identity, which audio tracks are currently published/subscribed. The
//! registry records fact; it never decides the gate.

use std::collections::{HashMap, HashSet};

use crate::events::{ParticipantIdentity, RoomEvent, TrackKind, TrackSid};

/// Tracks, per known identity, the set of live audio tracks
#[derive(Debug, Default)]
pub struct TrackRegistry {
    audio_tracks: HashMap<ParticipantIdentity, HashSet<TrackSid>>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed event.
    ///
    /// Set semantics make repeated publish/subscribe of the same track sid
    /// a no-op; unsubscribe of one track leaves presence true while another
    /// audio track remains. Non-audio tracks never touch presence.
    pub fn apply(&mut self, event: &RoomEvent) {
        match event {
            RoomEvent::ParticipantConnected { identity } => {
                // First observation creates an empty (absent-presence) entry
                self.audio_tracks.entry(identity.clone()).or_default();
            }
            RoomEvent::ParticipantDisconnected { identity } => {
                self.audio_tracks.remove(identity);
            }
            RoomEvent::TrackPublished { identity, sid, kind }
            | RoomEvent::TrackSubscribed { identity, sid, kind } => {
                if *kind == TrackKind::Audio {
                    self.audio_tracks
                        .entry(identity.clone())
                        .or_default()
                        .insert(sid.clone());
                }
            }
            RoomEvent::TrackUnpublished { identity, sid, kind }
            | RoomEvent::TrackUnsubscribed { identity, sid, kind } => {
                if *kind == TrackKind::Audio {
                    if let Some(tracks) = self.audio_tracks.get_mut(identity) {
                        tracks.remove(sid);
                    }
                }
            }
        }
    }

    /// Whether the identity currently has at least one live audio track.
    ///
    /// Unknown identities are simply absent: false, never an error.
    pub fn has_audio(&self, identity: &ParticipantIdentity) -> bool {
        self.audio_tracks
            .get(identity)
            .map(|tracks| !tracks.is_empty())
            .unwrap_or(false)
    }

    /// Identities currently known to the registry (diagnostics)
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantIdentity> {
        self.audio_tracks.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_subscribed(identity: &str, sid: &str) -> RoomEvent {
        RoomEvent::TrackSubscribed {
            identity: identity.into(),
            sid: TrackSid::new(sid),
            kind: TrackKind::Audio,
        }
    }

    fn audio_unsubscribed(identity: &str, sid: &str) -> RoomEvent {
        RoomEvent::TrackUnsubscribed {
            identity: identity.into(),
            sid: TrackSid::new(sid),
            kind: TrackKind::Audio,
        }
    }

    #[test]
    fn test_unknown_identity_has_no_audio() {
        let registry = TrackRegistry::new();
        assert!(!registry.has_audio(&"ysf".into()));
    }

    #[test]
    fn test_subscribe_then_unsubscribe() {
        let mut registry = TrackRegistry::new();

        registry.apply(&audio_subscribed("ysf", "TR_a"));
        assert!(registry.has_audio(&"ysf".into()));

        registry.apply(&audio_unsubscribed("ysf", "TR_a"));
        assert!(!registry.has_audio(&"ysf".into()));
    }

    #[test]
    fn test_duplicate_subscribe_is_idempotent() {
        let mut registry = TrackRegistry::new();

        registry.apply(&audio_subscribed("ysf", "TR_a"));
        registry.apply(&audio_subscribed("ysf", "TR_a"));
        assert!(registry.has_audio(&"ysf".into()));

        // One unsubscribe is enough to clear it
        registry.apply(&audio_unsubscribed("ysf", "TR_a"));
        assert!(!registry.has_audio(&"ysf".into()));
    }

    #[test]
    fn test_second_audio_track_keeps_presence() {
        let mut registry = TrackRegistry::new();

        registry.apply(&audio_subscribed("ysf", "TR_a"));
        registry.apply(&audio_subscribed("ysf", "TR_b"));

        registry.apply(&audio_unsubscribed("ysf", "TR_a"));
        assert!(registry.has_audio(&"ysf".into()));

        registry.apply(&audio_unsubscribed("ysf", "TR_b"));
        assert!(!registry.has_audio(&"ysf".into()));
    }

    #[test]
    fn test_video_track_does_not_count() {
        let mut registry = TrackRegistry::new();

        registry.apply(&RoomEvent::TrackSubscribed {
            identity: "ysf".into(),
            sid: TrackSid::new("TR_v"),
            kind: TrackKind::Video,
        });
        assert!(!registry.has_audio(&"ysf".into()));
    }

    #[test]
    fn test_connect_creates_absent_presence() {
        let mut registry = TrackRegistry::new();

        registry.apply(&RoomEvent::ParticipantConnected { identity: "ysf".into() });
        assert!(!registry.has_audio(&"ysf".into()));
        assert_eq!(registry.participants().count(), 1);
    }

    #[test]
    fn test_disconnect_clears_presence() {
        let mut registry = TrackRegistry::new();

        registry.apply(&audio_subscribed("ysf", "TR_a"));
        registry.apply(&RoomEvent::ParticipantDisconnected { identity: "ysf".into() });

        assert!(!registry.has_audio(&"ysf".into()));
        assert_eq!(registry.participants().count(), 0);
    }

    #[test]
    fn test_subscribe_before_connect_is_honored() {
        let mut registry = TrackRegistry::new();

        registry.apply(&audio_subscribed("ysf", "TR_a"));
        registry.apply(&RoomEvent::ParticipantConnected { identity: "ysf".into() });
        assert!(registry.has_audio(&"ysf".into()));
    }
}
