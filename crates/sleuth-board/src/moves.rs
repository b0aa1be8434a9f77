//! Dice-budget move validation.
//!
//! A move is legal when a route exists from the pawn's position to the
//! target within the rolled number of steps. Hallway steps cost one pip
//! each; stepping out through a door costs one, and stepping in through
//! a door costs one. Rooms have several doors, and the rules don't make
//! the player pick one: the validator tries every unblocked exit door ×
//! every unblocked entry door and charges for the cheapest combination.
//!
//! Validation never mutates anything. The caller applies the returned
//! [`ValidMove`] (or reports the [`MoveError`]) itself.

use std::collections::{HashMap, HashSet};

use crate::board::Board;
use crate::path::{shortest_path, Path};
use crate::types::{MoveTarget, PawnPosition, RoomId, Square, Suspect};

/// Why a requested move is illegal. The messages are user-facing; the
/// server forwards them to the offending client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("That square is not walkable.")]
    NotWalkable,

    #[error("That square is occupied.")]
    Occupied,

    /// Every door of the room the pawn is in has its hallway square
    /// occupied by another pawn.
    #[error("All exits are blocked.")]
    ExitsBlocked,

    /// No route exists at any cost (for a room target this includes all
    /// of its door hallways being occupied).
    #[error("No valid path to that destination.")]
    Unreachable,

    /// A route exists but costs more steps than the dice allowed.
    #[error("That is {needed} squares away, but you only rolled {rolled}.")]
    TooFar { needed: u32, rolled: u8 },
}

/// A validated move, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMove {
    /// Where the pawn ends up. For a room target this is the room itself;
    /// the pawn no longer occupies a hallway square.
    pub position: PawnPosition,
    /// Set when the move enters a room.
    pub entered_room: Option<RoomId>,
    /// The hallway squares walked, in order, for client animation. Starts
    /// at the exit-door hallway when leaving a room, and ends at the
    /// entry-door hallway when entering one.
    pub walked: Vec<Square>,
}

/// Validates a move of `mover` from `from` to `target` with `rolled`
/// steps available. `pawns` is the live pawn map; pawns other than the
/// mover standing in hallways block squares (pawns inside rooms block
/// nothing).
///
/// A square target lying inside a room footprint is treated as a move
/// into that room, so click-driven clients don't need to special-case
/// doors.
pub fn validate_move(
    board: &Board,
    from: &PawnPosition,
    target: MoveTarget,
    rolled: u8,
    pawns: &HashMap<Suspect, PawnPosition>,
    mover: Suspect,
) -> Result<ValidMove, MoveError> {
    let occupied = occupied_squares(pawns, mover);

    // One pip to step out of a room, one to step into one.
    let exit_cost = u32::from(from.room().is_some());

    let room_target = match target {
        MoveTarget::Room { room } => Some(room),
        MoveTarget::Square(sq) => board.room_at(sq),
    };

    match room_target {
        Some(room) => {
            let starts = start_squares(board, from, &occupied)?;
            let mut best: Option<Path> = None;
            for entry in board.room(room).doors() {
                if occupied.contains(&entry.hallway) {
                    continue;
                }
                for &start in &starts {
                    let Some(path) = shortest_path(board, start, entry.hallway, &occupied)
                    else {
                        continue;
                    };
                    let better = match &best {
                        Some(b) => path.distance < b.distance,
                        None => true,
                    };
                    if better {
                        best = Some(path);
                    }
                }
            }

            let Some(path) = best else {
                return Err(MoveError::Unreachable);
            };
            let needed = path.distance + exit_cost + 1;
            if needed > u32::from(rolled) {
                return Err(MoveError::TooFar { needed, rolled });
            }
            Ok(ValidMove {
                position: PawnPosition::InRoom { room },
                entered_room: Some(room),
                walked: path.squares,
            })
        }
        None => {
            let MoveTarget::Square(goal) = target else {
                // Room targets were handled above.
                unreachable!()
            };
            if !board.is_walkable(goal) {
                return Err(MoveError::NotWalkable);
            }
            if occupied.contains(&goal) {
                return Err(MoveError::Occupied);
            }

            let starts = start_squares(board, from, &occupied)?;
            let mut best: Option<Path> = None;
            for &start in &starts {
                let Some(path) = shortest_path(board, start, goal, &occupied) else {
                    continue;
                };
                let better = match &best {
                    Some(b) => path.distance < b.distance,
                    None => true,
                };
                if better {
                    best = Some(path);
                }
            }

            let Some(path) = best else {
                return Err(MoveError::Unreachable);
            };
            let needed = path.distance + exit_cost;
            if needed > u32::from(rolled) {
                return Err(MoveError::TooFar { needed, rolled });
            }
            Ok(ValidMove {
                position: PawnPosition::At(goal),
                entered_room: None,
                walked: path.squares,
            })
        }
    }
}

/// Hallway squares held by pawns other than `mover`. Pawns inside rooms
/// hold no square.
fn occupied_squares(
    pawns: &HashMap<Suspect, PawnPosition>,
    mover: Suspect,
) -> HashSet<Square> {
    pawns
        .iter()
        .filter(|&(&suspect, _)| suspect != mover)
        .filter_map(|(_, pos)| pos.square())
        .collect()
}

/// Where routes may begin: the pawn's own square, or, when it stands in
/// a room, the hallway square of each door that is not occupied.
fn start_squares(
    board: &Board,
    from: &PawnPosition,
    occupied: &HashSet<Square>,
) -> Result<Vec<Square>, MoveError> {
    match from {
        PawnPosition::At(sq) => Ok(vec![*sq]),
        PawnPosition::InRoom { room } => {
            let exits: Vec<Square> = board
                .room(*room)
                .doors()
                .iter()
                .map(|d| d.hallway)
                .filter(|h| !occupied.contains(h))
                .collect();
            if exits.is_empty() {
                Err(MoveError::ExitsBlocked)
            } else {
                Ok(exits)
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
