//! Event source adapter
//!
//! Boundary where room lifecycle notifications enter the process. The
//! external room bridge connects over a Unix domain socket and writes
//! length-prefixed JSON frames; well-formed frames become `RoomEvent`s on
//! the gate controller's channel, malformed frames drop the offending
//! connection. No gating logic lives here.

mod frame;
mod listener;

pub use frame::{read_event, write_event, FeedError, MAX_FRAME_LEN};
pub use listener::FeedListener;
