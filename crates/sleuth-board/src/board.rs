//! The static board: room footprints, doors, secret passages, and walls.
//!
//! The mansion is a 24×25 grid. Nine room footprints cover most of it,
//! hallway squares fill the gaps, and a handful of squares are walled off
//! outright (board edges next to the starting alcoves, plus the envelope
//! area in the middle where the solution cards sit).
//!
//! ```text
//!       col 1 ...................... col 24
//! row 1  [study]    [hall]      [lounge]
//!        [library]           [dining room]
//!        [billiard]  (envelope)
//!        [conservatory] [ballroom] [kitchen]
//! row 25
//! ```
//!
//! Every query on [`Board`] is a pure read. Build one with [`Board::new`]
//! or grab the shared instance via [`Board::get`]; the tables never change
//! at runtime.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::types::{RoomId, Square, Suspect, Weapon};

/// Number of columns (letters A..X on the printed board).
pub const BOARD_COLS: u8 = 24;
/// Number of rows.
pub const BOARD_ROWS: u8 = 25;

// ---------------------------------------------------------------------------
// Room geometry
// ---------------------------------------------------------------------------

/// An inclusive rectangle of squares, 1-based on both axes.
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub min_col: u8,
    pub min_row: u8,
    pub max_col: u8,
    pub max_row: u8,
}

impl Rect {
    fn squares(self) -> Vec<Square> {
        let mut out = Vec::new();
        for row in self.min_row..=self.max_row {
            for col in self.min_col..=self.max_col {
                out.push(Square::new(col, row));
            }
        }
        out
    }

    /// Floor midpoint of the rectangle.
    fn center(self) -> Square {
        Square::new(
            (self.min_col + self.max_col) / 2,
            (self.min_row + self.max_row) / 2,
        )
    }
}

/// A doorway: the room square the door is drawn on, and the hallway
/// square directly outside it. Pawns step between rooms and hallways
/// only through these pairs.
#[derive(Debug, Clone, Copy)]
pub struct Door {
    pub room_square: Square,
    pub hallway: Square,
}

/// A secret passage in a corner room: stepping on it teleports to the
/// diagonally opposite corner room.
#[derive(Debug, Clone, Copy)]
pub struct Passage {
    /// The room square the passage is drawn on (for the client's board).
    pub square: Square,
    /// Destination room.
    pub to: RoomId,
}

/// One room's full footprint.
#[derive(Debug, Clone)]
pub struct RoomDef {
    pub id: RoomId,
    squares: HashSet<Square>,
    /// The rectangle clients use to lay out pawns and weapon tokens; its
    /// midpoint is the room's anchor square. For irregular rooms this is
    /// the main rectangle, not the full footprint.
    display_area: Rect,
    doors: Vec<Door>,
    passage: Option<Passage>,
}

impl RoomDef {
    pub fn contains(&self, sq: Square) -> bool {
        self.squares.contains(&sq)
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.passage.as_ref()
    }

    /// The room's anchor square, where arriving pawns and weapon tokens
    /// are placed. Always inside the room footprint.
    pub fn center(&self) -> Square {
        self.display_area.center()
    }

    #[cfg(test)]
    fn square_count(&self) -> usize {
        self.squares.len()
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The assembled board. Construction wires up the room footprints, a
/// reverse square→room index, and the blocked-square set; everything
/// after that is lookups.
#[derive(Debug)]
pub struct Board {
    /// Indexed by `RoomId as usize`, in [`RoomId::ALL`] order.
    rooms: [RoomDef; 9],
    square_rooms: HashMap<Square, RoomId>,
    blocked: HashSet<Square>,
}

fn sq(col: u8, row: u8) -> Square {
    Square::new(col, row)
}

fn rect(min_col: u8, min_row: u8, max_col: u8, max_row: u8) -> Rect {
    Rect {
        min_col,
        min_row,
        max_col,
        max_row,
    }
}

fn door(rc: u8, rr: u8, hc: u8, hr: u8) -> Door {
    Door {
        room_square: sq(rc, rr),
        hallway: sq(hc, hr),
    }
}

fn room_def(
    id: RoomId,
    mut squares: Vec<Square>,
    extra: &[Square],
    display_area: Rect,
    doors: Vec<Door>,
    passage: Option<Passage>,
) -> RoomDef {
    squares.extend_from_slice(extra);
    RoomDef {
        id,
        squares: squares.into_iter().collect(),
        display_area,
        doors,
        passage,
    }
}

impl Board {
    /// The shared board instance. All tables are immutable, so one copy
    /// serves every room task in the process.
    pub fn get() -> &'static Board {
        static BOARD: LazyLock<Board> = LazyLock::new(Board::new);
        &BOARD
    }

    /// Builds the board from the printed-board tables. Grid references in
    /// the comments (A4, X6, ...) follow the column-letter/row-number
    /// convention of the physical board.
    pub fn new() -> Board {
        let rooms = [
            // Study: A1-G4, secret passage to the kitchen from A4.
            room_def(
                RoomId::Study,
                rect(1, 1, 7, 4).squares(),
                &[],
                rect(1, 1, 7, 4),
                vec![door(7, 4, 7, 5)],
                Some(Passage {
                    square: sq(1, 4),
                    to: RoomId::Kitchen,
                }),
            ),
            // Hall: J1-O7, three doors.
            room_def(
                RoomId::Hall,
                rect(10, 1, 15, 7).squares(),
                &[],
                rect(10, 1, 15, 7),
                vec![
                    door(10, 5, 9, 5),
                    door(12, 7, 12, 8),
                    door(13, 7, 13, 8),
                ],
                None,
            ),
            // Lounge: R1-X6, secret passage to the conservatory from X6.
            room_def(
                RoomId::Lounge,
                rect(18, 1, 24, 6).squares(),
                &[],
                rect(18, 1, 24, 6),
                vec![door(18, 6, 18, 7)],
                Some(Passage {
                    square: sq(24, 6),
                    to: RoomId::Conservatory,
                }),
            ),
            // Library: B7-F11 plus the bulges A8-A10 and G8-G10.
            room_def(
                RoomId::Library,
                rect(2, 7, 6, 11).squares(),
                &[sq(1, 8), sq(1, 9), sq(1, 10), sq(7, 8), sq(7, 9), sq(7, 10)],
                rect(2, 7, 6, 11),
                vec![door(7, 9, 8, 9), door(4, 11, 4, 12)],
                None,
            ),
            // Dining Room: Q10-X15 plus the T16-X16 strip.
            room_def(
                RoomId::Dining,
                rect(17, 10, 24, 15).squares(),
                &[sq(20, 16), sq(21, 16), sq(22, 16), sq(23, 16), sq(24, 16)],
                rect(17, 10, 24, 15),
                vec![door(17, 13, 16, 13), door(18, 10, 18, 9)],
                None,
            ),
            // Billiard Room: A13-F17.
            room_def(
                RoomId::Billiard,
                rect(1, 13, 6, 17).squares(),
                &[],
                rect(1, 13, 6, 17),
                vec![door(2, 13, 2, 12), door(6, 16, 7, 16)],
                None,
            ),
            // Conservatory: A21-F24 plus B20-E20; passage to the lounge
            // from B20.
            room_def(
                RoomId::Conservatory,
                rect(1, 21, 6, 24).squares(),
                &[sq(2, 20), sq(3, 20), sq(4, 20), sq(5, 20)],
                rect(2, 21, 5, 24),
                vec![door(5, 20, 6, 20)],
                Some(Passage {
                    square: sq(2, 20),
                    to: RoomId::Lounge,
                }),
            ),
            // Ballroom: I18-P23 plus the K24-N25 apron, four doors.
            room_def(
                RoomId::Ballroom,
                rect(9, 18, 16, 23).squares(),
                &[
                    sq(11, 24),
                    sq(12, 24),
                    sq(13, 24),
                    sq(14, 24),
                    sq(11, 25),
                    sq(12, 25),
                    sq(13, 25),
                    sq(14, 25),
                ],
                rect(9, 18, 16, 23),
                vec![
                    door(10, 18, 10, 17),
                    door(15, 18, 15, 17),
                    door(9, 20, 8, 20),
                    door(16, 20, 17, 20),
                ],
                None,
            ),
            // Kitchen: S19-X24, secret passage to the study from S24.
            room_def(
                RoomId::Kitchen,
                rect(19, 19, 24, 24).squares(),
                &[],
                rect(19, 19, 24, 24),
                vec![door(20, 19, 20, 18)],
                Some(Passage {
                    square: sq(19, 24),
                    to: RoomId::Study,
                }),
            ),
        ];

        let mut square_rooms = HashMap::new();
        for room in &rooms {
            for &square in &room.squares {
                square_rooms.insert(square, room.id);
            }
        }

        let mut blocked: HashSet<Square> = [
            // Top edge: I1, P1.
            sq(9, 1),
            sq(16, 1),
            // Left edge: A5, A7, A11, A12, A18, A20.
            sq(1, 5),
            sq(1, 7),
            sq(1, 11),
            sq(1, 12),
            sq(1, 18),
            sq(1, 20),
            // Right edge: X7, X9, X17.
            sq(24, 7),
            sq(24, 9),
            sq(24, 17),
            // Bottom area: G24, R24.
            sq(7, 24),
            sq(18, 24),
        ]
        .into_iter()
        .collect();

        // Bottom row is walled except the J25/O25 starting squares and the
        // K25-N25 ballroom apron.
        for col in 1..=9 {
            blocked.insert(sq(col, 25));
        }
        for col in 16..=24 {
            blocked.insert(sq(col, 25));
        }

        // Envelope area J9-N15: the solution cards live here, nothing walks
        // through it.
        for square in rect(10, 9, 14, 15).squares() {
            blocked.insert(square);
        }

        Board {
            rooms,
            square_rooms,
            blocked,
        }
    }

    // -- Queries ------------------------------------------------------------

    pub fn in_bounds(&self, square: Square) -> bool {
        (1..=BOARD_COLS).contains(&square.col) && (1..=BOARD_ROWS).contains(&square.row)
    }

    /// The room whose footprint covers this square, if any.
    pub fn room_at(&self, square: Square) -> Option<RoomId> {
        self.square_rooms.get(&square).copied()
    }

    /// Whether a pawn may stand on this square: in bounds, not walled off,
    /// and not inside a room footprint (rooms are entered as a whole, not
    /// square by square).
    pub fn is_walkable(&self, square: Square) -> bool {
        self.in_bounds(square)
            && !self.blocked.contains(&square)
            && !self.square_rooms.contains_key(&square)
    }

    /// Whether this square is walled off: the wall and edge fills, the
    /// envelope area, or a room interior square that is not a doorway.
    /// Doorway squares stay unblocked, but they are still not walkable
    /// because they belong to their room.
    pub fn is_blocked(&self, square: Square) -> bool {
        if self.blocked.contains(&square) {
            return true;
        }
        match self.room_at(square) {
            Some(room) => self
                .room(room)
                .doors()
                .iter()
                .all(|d| d.room_square != square),
            None => false,
        }
    }

    pub fn room(&self, id: RoomId) -> &RoomDef {
        &self.rooms[id as usize]
    }

    /// The anchor square pawns and weapon tokens are placed on when they
    /// arrive in a room.
    pub fn room_center(&self, id: RoomId) -> Square {
        self.room(id).center()
    }

    /// Where each suspect's pawn starts the game, in the alcoves around
    /// the board edge.
    pub fn starting_square(&self, suspect: Suspect) -> Square {
        match suspect {
            Suspect::Mustard => sq(24, 8),  // X8
            Suspect::Scarlett => sq(17, 1), // Q1
            Suspect::Plum => sq(1, 6),      // A6
            Suspect::Green => sq(10, 25),   // J25
            Suspect::White => sq(15, 25),   // O25
            Suspect::Peacock => sq(1, 19),  // A19
        }
    }

    /// Which room each weapon token starts in.
    pub fn initial_weapon_room(&self, weapon: Weapon) -> RoomId {
        match weapon {
            Weapon::Candlestick => RoomId::Kitchen,
            Weapon::Knife => RoomId::Ballroom,
            Weapon::Leadpipe => RoomId::Conservatory,
            Weapon::Revolver => RoomId::Billiard,
            Weapon::Rope => RoomId::Library,
            Weapon::Wrench => RoomId::Study,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
