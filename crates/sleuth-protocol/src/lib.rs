//! Wire protocol for Sleuth.
//!
//! This crate defines the "language" the browser client and the server
//! speak:
//!
//! - **Types** ([`ClientCommand`], [`ServerEvent`], [`PlayerId`],
//!   [`RoomCode`], ...) — the tagged JSON messages and the identifiers
//!   inside them.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how messages are
//!   converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing that.
//!
//! The protocol layer knows nothing about sockets or game rules; it
//! sits between the two:
//!
//! ```text
//! Transport (bytes) → Protocol (commands/events) → Game (rules)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientCommand, PlayerId, PlayerSummary, Recipient, RoomCode, SeatSummary,
    ServerEvent, SuggestionRecap, TurnPhase,
};
