//! `Server`: bind, accept, spawn a handler per connection.
//!
//! This is the entry point for running a Sleuth server. It ties the
//! layers together: transport → protocol → room → game.

use std::sync::Arc;

use sleuth_protocol::JsonCodec;
use sleuth_room::RoomStore;
use sleuth_transport::WsListener;

use crate::ServerError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The store
/// carries its own lock; the codec is a zero-sized value.
pub(crate) struct ServerState {
    pub(crate) store: RoomStore,
    pub(crate) codec: JsonCodec,
}

/// A running Sleuth server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server {
    listener: WsListener,
    state: Arc<ServerState>,
}

impl Server {
    /// Binds to `addr` and prepares the shared state.
    pub async fn bind(addr: &str) -> Result<Self, ServerError> {
        let listener = WsListener::bind(addr).await?;
        Ok(Self {
            listener,
            state: Arc::new(ServerState {
                store: RoomStore::new(),
                codec: JsonCodec,
            }),
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop.
    ///
    /// Each accepted connection gets its own handler task. Runs until
    /// the process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("Sleuth server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
