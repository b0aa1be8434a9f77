//! Per-connection handler: join, event pump, command routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Wait for a `join` command → seat the player in their room
//!   2. Spawn the event pump: room events → socket writer
//!   3. Loop: receive commands → forward to the room
//!   4. On any exit, tell the room the player is gone

use std::sync::Arc;

use sleuth_protocol::{ClientCommand, Codec, JsonCodec, PlayerId, ServerEvent};
use sleuth_room::RoomHandle;
use sleuth_transport::{WsConnection, WsSender};
use tokio::sync::mpsc;

use crate::ServerError;
use crate::server::ServerState;

/// Drop guard that tells the room when the connection goes away.
///
/// Cleanup must run even if the handler task panics. `Drop` is
/// synchronous, so the async disconnect goes through a spawned task,
/// followed by a store prune so a dead room's code frees up.
struct RoomGuard {
    player_id: PlayerId,
    room: RoomHandle,
    state: Arc<ServerState>,
}

impl Drop for RoomGuard {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let room = self.room.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let _ = room.disconnect(player_id).await;
            state.store.prune().await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    mut conn: WsConnection,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    // One identity per connection. There is no reconnect, so the raw
    // connection counter doubles as the player id.
    let player_id = PlayerId(conn_id.into_inner());
    let ws = conn.sender();
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    // --- Step 1: the client must join a room before anything else ---
    let Some(room) = await_join(&mut conn, &ws, &state, player_id).await? else {
        return Ok(()); // socket closed before joining
    };
    let _guard = RoomGuard {
        player_id,
        room: room.clone(),
        state: Arc::clone(&state),
    };

    // --- Step 2: command loop ---
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let command: ClientCommand = match state.codec.decode(&data) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode command");
                send_error(&ws, &state.codec, &format!("Unrecognized command: {e}"))?;
                continue;
            }
        };

        if room.command(player_id, command).await.is_err() {
            tracing::debug!(%player_id, "room gone, closing connection");
            break;
        }
    }

    // _guard drops here → the room hears about the disconnect.
    Ok(())
}

/// Waits for a valid `join` and seats the player.
///
/// Anything else on the wire is answered with an error while the socket
/// stays open, so a client can retry after a taken name or a full room.
/// Returns `None` if the socket closes before a join lands.
async fn await_join(
    conn: &mut WsConnection,
    ws: &WsSender,
    state: &Arc<ServerState>,
    player_id: PlayerId,
) -> Result<Option<RoomHandle>, ServerError> {
    loop {
        let Some(data) = conn.recv().await? else {
            return Ok(None);
        };

        let command: ClientCommand = match state.codec.decode(&data) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode command");
                send_error(ws, &state.codec, &format!("Unrecognized command: {e}"))?;
                continue;
            }
        };

        let ClientCommand::Join { name, room_code } = command else {
            send_error(ws, &state.codec, "Join a room first.")?;
            continue;
        };

        let (events, inbox) = mpsc::unbounded_channel();
        match state.store.join(room_code, player_id, &name, events).await {
            Ok(room) => {
                tracing::info!(%player_id, room = %room_code, name = %name, "joined room");
                tokio::spawn(pump_events(inbox, ws.clone(), state.codec));
                return Ok(Some(room));
            }
            Err(e) => {
                send_error(ws, &state.codec, &e.to_string())?;
            }
        }
    }
}

/// Forwards room events to the socket until the room drops the channel,
/// then starts the close handshake so the client learns the room died.
async fn pump_events(
    mut inbox: mpsc::UnboundedReceiver<ServerEvent>,
    ws: WsSender,
    codec: JsonCodec,
) {
    while let Some(event) = inbox.recv().await {
        let bytes = match codec.encode(&event) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode event");
                continue;
            }
        };
        if ws.send(bytes).is_err() {
            // Socket gone; the reader half notices on its own.
            break;
        }
    }
    ws.close();
}

/// Sends an error event straight to the socket, outside any room.
fn send_error(ws: &WsSender, codec: &JsonCodec, message: &str) -> Result<(), ServerError> {
    let event = ServerEvent::Error {
        message: message.to_string(),
    };
    let bytes = codec.encode(&event)?;
    ws.send(bytes)?;
    Ok(())
}
