//! The room store: live rooms keyed by join code.
//!
//! Players do not browse rooms; they bring a code. The first join under
//! a code spawns the room, later joins under the same code land at the
//! same table. Once a room's task exits its code is free again, and the
//! next join simply gets a fresh lobby.

use std::collections::HashMap;

use sleuth_protocol::{PlayerId, RoomCode};
use tokio::sync::Mutex;

use crate::RoomError;
use crate::room::{EventSender, RoomHandle, spawn_room};

/// Default command channel depth for each room task.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Registry of live rooms. Shared by all connection handlers.
pub struct RoomStore {
    rooms: Mutex<HashMap<RoomCode, RoomHandle>>,
}

impl RoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Joins `player_id` to the room for `code`, spawning the room if
    /// none is live. Events for the player flow through `sender`.
    ///
    /// A room can shut down at any moment (its last player may be
    /// disconnecting concurrently), so a join that hits a closing room
    /// forgets the stale handle and tries once more with a fresh one.
    pub async fn join(
        &self,
        code: RoomCode,
        player_id: PlayerId,
        name: &str,
        sender: EventSender,
    ) -> Result<RoomHandle, RoomError> {
        for _ in 0..2 {
            let handle = self.get_or_create(code).await;
            match handle.join(player_id, name.to_owned(), sender.clone()).await {
                Err(RoomError::Unavailable(_)) => self.forget(code, &handle).await,
                Err(other) => return Err(other),
                Ok(()) => return Ok(handle),
            }
        }
        Err(RoomError::Unavailable(code))
    }

    /// Returns the live room for `code`, spawning one if there is none
    /// (or if the previous room under this code has already closed).
    pub async fn get_or_create(&self, code: RoomCode) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        if let Some(handle) = rooms.get(&code) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }
        let handle = spawn_room(code, DEFAULT_CHANNEL_SIZE);
        rooms.insert(code, handle.clone());
        tracing::info!(room = %code, rooms = rooms.len(), "created room");
        handle
    }

    /// Drops entries whose room task has exited. Returns how many were
    /// removed.
    pub async fn prune(&self) -> usize {
        let mut rooms = self.rooms.lock().await;
        let before = rooms.len();
        rooms.retain(|_, handle| !handle.is_closed());
        before - rooms.len()
    }

    /// Number of rooms currently tracked (closed ones count until the
    /// next prune).
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Removes the entry for `code`, but only while it still points at
    /// `stale`. A concurrent join may already have replaced it.
    async fn forget(&self, code: RoomCode, stale: &RoomHandle) {
        let mut rooms = self.rooms.lock().await;
        if let Some(current) = rooms.get(&code) {
            if current.same_channel(stale) {
                rooms.remove(&code);
            }
        }
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}
