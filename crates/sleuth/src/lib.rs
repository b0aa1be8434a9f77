//! # Sleuth
//!
//! WebSocket server for a Clue-style deduction board game played in the
//! browser. Players join a room by numeric code, the host starts the
//! game, and the server referees everything: dice, movement,
//! suggestions, disproofs, accusations.
//!
//! The workspace layers:
//!
//! - `sleuth-board` — static board data, pathfinding, the deck
//! - `sleuth-game` — the rules: turns, suggestions, sessions
//! - `sleuth-protocol` — wire types and the JSON codec
//! - `sleuth-room` — one actor task per room, event fan-out
//! - `sleuth-transport` — WebSocket accept/read/write plumbing
//! - `sleuth` (this crate) — accept loop and per-connection handlers

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::Server;
