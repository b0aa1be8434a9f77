//! Core identity types for the board and the cards.
//!
//! Everything here travels on the wire, so the serde attributes define the
//! exact JSON the browser client sees. Suspects, weapons, and rooms are
//! closed enums rather than strings: a command naming a suspect that does
//! not exist fails at decode time, before any game logic runs.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A single square on the 24×25 grid.
///
/// Coordinates are 1-based: columns run 1..=24 (the classic board letters
/// A..X) and rows run 1..=25. `(1, 1)` is the top-left corner.
///
/// Serializes as `{"col": 7, "row": 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub col: u8,
    pub row: u8,
}

impl Square {
    pub const fn new(col: u8, row: u8) -> Self {
        Square { col, row }
    }
}

/// Prints as the classic board grid reference: column letter + row number,
/// so `(7, 5)` displays as "G5". Handy in logs and error messages.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'A' + self.col.saturating_sub(1)) as char;
        write!(f, "{}{}", letter, self.row)
    }
}

// ---------------------------------------------------------------------------
// Rooms, suspects, weapons
// ---------------------------------------------------------------------------

/// The nine rooms of the mansion.
///
/// Serializes as the lowercase identifier (`"kitchen"`, `"billiard"`, ...),
/// which is also what room cards and suggestion commands carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomId {
    Study,
    Hall,
    Lounge,
    Library,
    Dining,
    Billiard,
    Conservatory,
    Ballroom,
    Kitchen,
}

impl RoomId {
    /// All nine rooms, in board reading order (top-left to bottom-right).
    pub const ALL: [RoomId; 9] = [
        RoomId::Study,
        RoomId::Hall,
        RoomId::Lounge,
        RoomId::Library,
        RoomId::Dining,
        RoomId::Billiard,
        RoomId::Conservatory,
        RoomId::Ballroom,
        RoomId::Kitchen,
    ];

    /// The name printed on the room's card.
    pub fn name(self) -> &'static str {
        match self {
            RoomId::Study => "Study",
            RoomId::Hall => "Hall",
            RoomId::Lounge => "Lounge",
            RoomId::Library => "Library",
            RoomId::Dining => "Dining Room",
            RoomId::Billiard => "Billiard Room",
            RoomId::Conservatory => "Conservatory",
            RoomId::Ballroom => "Ballroom",
            RoomId::Kitchen => "Kitchen",
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six suspects. Every suspect's pawn is on the board in every game,
/// whether or not a player controls it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suspect {
    Mustard,
    Scarlett,
    Plum,
    Green,
    White,
    Peacock,
}

impl Suspect {
    pub const ALL: [Suspect; 6] = [
        Suspect::Mustard,
        Suspect::Scarlett,
        Suspect::Plum,
        Suspect::Green,
        Suspect::White,
        Suspect::Peacock,
    ];

    /// The name printed on the suspect's card.
    pub fn name(self) -> &'static str {
        match self {
            Suspect::Mustard => "Colonel Mustard",
            Suspect::Scarlett => "Miss Scarlett",
            Suspect::Plum => "Professor Plum",
            Suspect::Green => "Mr. Green",
            Suspect::White => "Mrs. White",
            Suspect::Peacock => "Mrs. Peacock",
        }
    }

    /// The pawn colour shown on the board.
    pub fn color(self) -> &'static str {
        match self {
            Suspect::Mustard => "Yellow",
            Suspect::Scarlett => "Red",
            Suspect::Plum => "Purple",
            Suspect::Green => "Green",
            Suspect::White => "White",
            Suspect::Peacock => "Blue",
        }
    }
}

impl fmt::Display for Suspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The six weapons. Like pawns, all six tokens sit on the board at all
/// times; suggestions move them between rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weapon {
    Candlestick,
    Knife,
    Leadpipe,
    Revolver,
    Rope,
    Wrench,
}

impl Weapon {
    pub const ALL: [Weapon; 6] = [
        Weapon::Candlestick,
        Weapon::Knife,
        Weapon::Leadpipe,
        Weapon::Revolver,
        Weapon::Rope,
        Weapon::Wrench,
    ];

    /// The name printed on the weapon's card.
    pub fn name(self) -> &'static str {
        match self {
            Weapon::Candlestick => "Candlestick",
            Weapon::Knife => "Knife",
            Weapon::Leadpipe => "Leadpipe",
            Weapon::Revolver => "Revolver",
            Weapon::Rope => "Rope",
            Weapon::Wrench => "Wrench",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// One card from the 21-card deck: 6 suspects + 6 weapons + 9 rooms.
///
/// `#[serde(tag = "type", content = "id")]` produces adjacently tagged
/// JSON, so a card is `{"type": "suspect", "id": "mustard"}` on the wire.
/// The display name is derivable from the id, so it is not transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Card {
    Suspect(Suspect),
    Weapon(Weapon),
    Room(RoomId),
}

impl Card {
    /// The name printed on the card.
    pub fn name(self) -> &'static str {
        match self {
            Card::Suspect(s) => s.name(),
            Card::Weapon(w) => w.name(),
            Card::Room(r) => r.name(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three cards hidden in the envelope at the start of a game:
/// exactly one suspect, one weapon, one room.
///
/// Only revealed to clients when a game ends (correct accusation, or a
/// win by elimination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: RoomId,
}

impl Solution {
    /// Whether an accusation names all three envelope cards.
    pub fn matches(&self, suspect: Suspect, weapon: Weapon, room: RoomId) -> bool {
        self.suspect == suspect && self.weapon == weapon && self.room == room
    }
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Where a pawn (or the token of an unplayed suspect) currently is.
///
/// A pawn in a hallway occupies one concrete square and blocks it for
/// other pawns. A pawn in a room occupies the *room*, not any square:
/// rooms hold any number of pawns and clients lay them out however they
/// like (the board's `room_center` is the canonical anchor point).
///
/// `#[serde(untagged)]` keeps the wire format flat: a hallway position is
/// `{"col": 7, "row": 5}` and a room position is `{"room": "study"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PawnPosition {
    InRoom { room: RoomId },
    At(Square),
}

impl PawnPosition {
    /// The room this pawn is in, if any.
    pub fn room(&self) -> Option<RoomId> {
        match self {
            PawnPosition::InRoom { room } => Some(*room),
            PawnPosition::At(_) => None,
        }
    }

    /// The hallway square this pawn stands on, if it is not in a room.
    pub fn square(&self) -> Option<Square> {
        match self {
            PawnPosition::InRoom { .. } => None,
            PawnPosition::At(sq) => Some(*sq),
        }
    }
}

impl fmt::Display for PawnPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PawnPosition::InRoom { room } => write!(f, "{room}"),
            PawnPosition::At(sq) => write!(f, "{sq}"),
        }
    }
}

/// Where a player asks to move: either a hallway square or a room.
///
/// Clients that work from board clicks may also send the clicked square
/// for a room move; the validator resolves a square inside a room to that
/// room. Same untagged wire shapes as [`PawnPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveTarget {
    Room { room: RoomId },
    Square(Square),
}

// =========================================================================
// Tests
// =========================================================================
