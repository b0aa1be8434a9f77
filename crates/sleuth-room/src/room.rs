//! Room actor: an isolated Tokio task that owns one table.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the "actor model" — no shared
//! mutable state, just message passing. The task owns the [`Session`]
//! and the dice RNG, so gameplay never needs a lock.
//!
//! Events the session emits are fanned out to per-player channels; the
//! connection layer drains those into websockets.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sleuth_game::{Rejection, Session};
use sleuth_protocol::{ClientCommand, PlayerId, Recipient, RoomCode, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

/// Channel sender for delivering events to one player's connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` on `Join` is a reply channel: the caller waits
/// on it to learn whether the session accepted the seat. Gameplay
/// commands need no reply because a rejection goes back to the player
/// as a regular [`ServerEvent::Error`].
#[derive(Debug)]
pub(crate) enum RoomCommand {
    /// Seat a player, registering where their events should go.
    Join {
        player_id: PlayerId,
        name: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(), Rejection>>,
    },

    /// A lobby or gameplay command from a seated player.
    Command {
        sender: PlayerId,
        command: ClientCommand,
    },

    /// The player's connection is gone.
    Disconnect { player_id: PlayerId },
}

// =========================================================================
// RoomHandle — the public interface to a room actor
// =========================================================================

/// A handle for communicating with a room actor.
///
/// Cheap to clone — it's just a channel sender plus the room's code.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The join code this room answers to.
    pub fn code(&self) -> RoomCode {
        self.code
    }

    /// True once the room task has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub(crate) fn same_channel(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Asks the room to seat `player_id` under `name`.
    ///
    /// On success the player's `Joined` acknowledgement and the roster
    /// broadcast arrive through `sender` before this returns.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name,
                sender,
                reply,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code))?;
        response
            .await
            .map_err(|_| RoomError::Unavailable(self.code))??;
        Ok(())
    }

    /// Forwards a player command to the room.
    ///
    /// Fire-and-forget: rejections are not reported here. The room
    /// answers the sender directly with a [`ServerEvent::Error`].
    pub async fn command(
        &self,
        sender: PlayerId,
        command: ClientCommand,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Command { sender, command })
            .await
            .map_err(|_| RoomError::Unavailable(self.code))
    }

    /// Tells the room that `player_id`'s connection is gone.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.code))
    }
}

// =========================================================================
// RoomActor — the task that owns the table
// =========================================================================

/// The room actor. Owns the session, the dice RNG, and the outbound
/// channel of every connected player.
struct RoomActor {
    session: Session,
    rng: StdRng,
    senders: HashMap<PlayerId, EventSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Main loop. Runs until the session closes (last player gone, or
    /// the host declined a rematch).
    async fn run(mut self) {
        let code = self.session.code();
        tracing::info!(room = %code, "room opened");

        while let Some(command) = self.receiver.recv().await {
            match command {
                RoomCommand::Join {
                    player_id,
                    name,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, name, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Command { sender, command } => self.handle_command(sender, command),
                RoomCommand::Disconnect { player_id } => self.handle_disconnect(player_id),
            }

            if self.session.is_closed() {
                break;
            }
        }

        tracing::info!(room = %code, "room closed");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: String,
        sender: EventSender,
    ) -> Result<(), Rejection> {
        let events = self.session.join(player_id, name)?;
        self.senders.insert(player_id, sender);
        tracing::info!(
            room = %self.session.code(),
            %player_id,
            players = self.session.players().len(),
            "player joined"
        );
        self.dispatch(events);
        Ok(())
    }

    fn handle_command(&mut self, sender: PlayerId, command: ClientCommand) {
        match self.session.handle_command(sender, command, &mut self.rng) {
            Ok(events) => self.dispatch(events),
            Err(rejection) => {
                tracing::debug!(
                    room = %self.session.code(),
                    %sender,
                    %rejection,
                    "command rejected"
                );
                self.send_to(
                    sender,
                    ServerEvent::Error {
                        message: rejection.to_string(),
                    },
                );
            }
        }
    }

    fn handle_disconnect(&mut self, player_id: PlayerId) {
        // A connection that never made it past a rejected join has no
        // seat to vacate.
        if self.senders.remove(&player_id).is_none() {
            return;
        }
        let events = self.session.handle_disconnect(player_id);
        tracing::info!(
            room = %self.session.code(),
            %player_id,
            players = self.session.players().len(),
            "player left"
        );
        self.dispatch(events);
    }

    /// Fans events out to their recipients.
    fn dispatch(&self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            for (&player_id, sender) in &self.senders {
                if recipient.includes(player_id) {
                    let _ = sender.send(event.clone());
                }
            }
        }
    }

    /// Sends to one player, silently dropping the event if their
    /// channel is already closed. The disconnect path catches up with
    /// dead sockets soon enough.
    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }
}

/// Spawns a room task for `code` and returns a handle to it.
pub(crate) fn spawn_room(code: RoomCode, channel_size: usize) -> RoomHandle {
    let (sender, receiver) = mpsc::channel(channel_size);
    let actor = RoomActor {
        session: Session::new(code),
        rng: StdRng::from_os_rng(),
        senders: HashMap::new(),
        receiver,
    };
    tokio::spawn(actor.run());
    RoomHandle { code, sender }
}
