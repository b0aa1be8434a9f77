//! Session and turn state machine for Sleuth.
//!
//! One [`Session`] per room, driven entirely by its room task: admit
//! players, start games, route gameplay commands into the running
//! [`Game`], and handle the end-of-game ceremony. Everything is
//! synchronous and single-owner; the async fan-out of the returned
//! `(Recipient, ServerEvent)` pairs is the room layer's job.
//!
//! Rule violations come back as [`Rejection`] values whose display text
//! is shown to the offending player as-is.

mod error;
mod game;
mod session;

pub use error::Rejection;
pub use game::Game;
pub use session::{Player, Session, SessionPhase, MAX_PLAYERS, MIN_PLAYERS};
