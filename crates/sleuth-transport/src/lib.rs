//! WebSocket transport for Sleuth.
//!
//! Wraps `tokio-tungstenite` behind two small types: [`WsListener`]
//! accepts sockets, [`WsConnection`] is one client. The socket is split
//! on accept — the reader half stays with the connection while the
//! writer half runs in its own task behind a cloneable [`WsSender`], so
//! a room broadcast never waits on a socket that is busy reading.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener, WsSender};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
