//! Participant-scoped audio gate
//!
//! Converts the room event stream into a single authoritative decision:
//! is the target participant's audio currently routed downstream. The
//! registry records observed track presence; the controller owns the
//! decision and the sink.

mod controller;
mod registry;

pub use controller::{GateController, GateError};
pub use registry::TrackRegistry;
