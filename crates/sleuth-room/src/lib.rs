//! Room lifecycle management for Sleuth.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! [`Session`](sleuth_game::Session) and its dice RNG. Connection
//! handlers talk to the task through a [`RoomHandle`]; events the
//! session emits fan out to per-player channels.
//!
//! # Key types
//!
//! - [`RoomStore`] — live rooms keyed by join code, spawned on demand
//! - [`RoomHandle`] — send joins, commands and disconnects to a room
//! - [`EventSender`] — a player's outbound channel for
//!   [`ServerEvent`](sleuth_protocol::ServerEvent)s

mod error;
mod room;
mod store;

pub use error::RoomError;
pub use room::{EventSender, RoomHandle};
pub use store::RoomStore;
