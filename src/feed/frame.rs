//! Feed wire framing
//!
//! Each notification is JSON, prefixed with a 4-byte little-endian length.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::events::RoomEvent;

/// Upper bound on a single frame; anything larger is a protocol violation
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Failures at the feed boundary; none of these reach the gate controller
#[derive(Debug, Error)]
pub enum FeedError {
    /// The bridge connection closed mid-frame or failed outright
    #[error("feed connection error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame length prefix exceeds `MAX_FRAME_LEN`
    #[error("frame of {0} bytes exceeds limit")]
    FrameTooLarge(usize),

    /// Frame payload is not a well-formed room event
    #[error("malformed room event: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Read one length-prefixed room event.
///
/// Returns `Ok(None)` on a clean end-of-stream at a frame boundary.
pub async fn read_event<R>(reader: &mut R) -> Result<Option<RoomEvent>, FeedError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(FeedError::FrameTooLarge(len));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    let event = serde_json::from_slice(&payload)?;
    Ok(Some(event))
}

/// Write one length-prefixed room event (used by tests and tooling).
pub async fn write_event<W>(writer: &mut W, event: &RoomEvent) -> Result<(), FeedError>
where
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_vec(event)?;
    let len = (payload.len() as u32).to_le_bytes();

    writer.write_all(&len).await?;
    writer.write_all(&payload).await?;

    Ok(())
}
