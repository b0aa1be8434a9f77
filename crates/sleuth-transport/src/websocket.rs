//! WebSocket server pieces built on `tokio-tungstenite`.
//!
//! Each accepted socket is split. [`WsConnection`] keeps the read half;
//! the write half moves into a spawned task that drains an unbounded
//! queue, reachable through any clone of the connection's [`WsSender`].

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// Listens for incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    /// The address actually bound. Useful after binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener
            .local_addr()
            .map_err(TransportError::AcceptFailed)
    }

    /// Waits for the next client and completes the WebSocket handshake.
    pub async fn accept(&mut self) -> Result<WsConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            TransportError::AcceptFailed(io::Error::new(io::ErrorKind::ConnectionRefused, e))
        })?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        let (sink, reader) = ws.split();
        let (queue, outbox) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(id, sink, outbox));

        Ok(WsConnection {
            id,
            reader,
            sender: WsSender { id, queue },
        })
    }
}

/// A single client connection. Holds the read half of the socket;
/// writes go through [`WsSender`] clones.
pub struct WsConnection {
    id: ConnectionId,
    reader: SplitStream<WsStream>,
    sender: WsSender,
}

impl WsConnection {
    /// Unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// A write handle for this connection. Clone freely.
    pub fn sender(&self) -> WsSender {
        self.sender.clone()
    }

    /// Receives the next message payload from the peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            match self.reader.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_bytes().to_vec())),
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.into())),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }
}

/// Cheap-to-clone write handle for one connection.
///
/// Messages are queued in order; the connection's writer task owns the
/// socket's write half and drains the queue.
#[derive(Debug, Clone)]
pub struct WsSender {
    id: ConnectionId,
    queue: mpsc::UnboundedSender<Message>,
}

impl WsSender {
    /// Queues a text frame. The payload must be UTF-8, which JSON
    /// always is.
    pub fn send(&self, data: Vec<u8>) -> Result<(), TransportError> {
        let text = String::from_utf8(data).map_err(|e| {
            TransportError::SendFailed(io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        self.queue
            .send(Message::Text(text.into()))
            .map_err(|_| TransportError::ConnectionClosed(self.id.to_string()))
    }

    /// Queues a close frame; the writer task stops after sending it.
    pub fn close(&self) {
        let _ = self.queue.send(Message::Close(None));
    }
}

/// Drains queued messages into the socket's write half. Exits when the
/// queue closes, a write fails, or a close frame goes out.
async fn write_loop(
    id: ConnectionId,
    mut sink: SplitSink<WsStream, Message>,
    mut outbox: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = outbox.recv().await {
        let closing = matches!(msg, Message::Close(_));
        if let Err(e) = sink.send(msg).await {
            tracing::debug!(%id, error = %e, "write failed, stopping writer");
            break;
        }
        if closing {
            break;
        }
    }
}
