//! Error types for the room layer.

use sleuth_game::Rejection;
use sleuth_protocol::RoomCode;

/// Errors that can occur when talking to a room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room turned the request down. The message is written for the
    /// player who sent it and can be forwarded as-is.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The room's task has shut down, or its command channel is gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
