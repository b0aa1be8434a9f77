//! Board, movement, and cards for Sleuth.
//!
//! This crate is the rules-engine half that knows nothing about players,
//! turns, or the network: just the physical game. It provides
//!
//! - **The board** ([`Board`]) — the 24×25 grid, the nine room
//!   footprints, doors, secret passages, and walls.
//! - **Movement** ([`shortest_path`], [`validate_move`]) — hallway
//!   pathfinding around other pawns and dice-budget validation with
//!   door entry/exit costs.
//! - **Cards** ([`Card`], [`deal`]) — the 21-card deck, the envelope
//!   draw, and the round-robin deal.
//!
//! Everything here is synchronous and pure: functions take the state
//! they need and return values or errors, so the whole crate is usable
//! from tests without a runtime.

mod board;
mod deck;
mod moves;
mod path;
mod types;

pub use board::{Board, Door, Passage, Rect, RoomDef, BOARD_COLS, BOARD_ROWS};
pub use deck::{assign_suspects, deal, full_deck, Dealt};
pub use moves::{validate_move, MoveError, ValidMove};
pub use path::{shortest_path, Path};
pub use types::{
    Card, MoveTarget, PawnPosition, RoomId, Solution, Square, Suspect, Weapon,
};
