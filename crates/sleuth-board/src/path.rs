//! Shortest-path search over the hallway squares.
//!
//! Movement is orthogonal (no diagonals), one square per pip, and only
//! hallway squares are traversable: room footprints are entered through
//! doors, which the move validator accounts for separately. Other pawns
//! occupy their squares, so the search routes around them.
//!
//! Breadth-first search is exact here: every step costs one, and the
//! whole graph is at most 24×25 squares, so there is nothing to gain
//! from a weighted algorithm.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::board::Board;
use crate::types::Square;

/// A found route. `distance` is the number of steps; `squares` lists the
/// visited squares in order, starting square included, so clients can
/// animate the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub distance: u32,
    pub squares: Vec<Square>,
}

/// Finds a shortest route from `start` to `goal` across walkable hallway
/// squares, treating every square in `occupied` as impassable.
///
/// `start` itself is not checked for walkability: the searcher always
/// stands there already (their own square, or a door's hallway square
/// when leaving a room). Returns `None` when no route exists.
///
/// Neighbours expand in up/down/left/right order, which makes the
/// returned route deterministic among equally short ones.
pub fn shortest_path(
    board: &Board,
    start: Square,
    goal: Square,
    occupied: &HashSet<Square>,
) -> Option<Path> {
    if start == goal {
        return Some(Path {
            distance: 0,
            squares: vec![start],
        });
    }

    let mut visited: HashSet<Square> = HashSet::new();
    let mut came_from: HashMap<Square, Square> = HashMap::new();
    let mut queue: VecDeque<(Square, u32)> = VecDeque::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((pos, dist)) = queue.pop_front() {
        for next in neighbours(pos) {
            if visited.contains(&next) {
                continue;
            }
            if !board.is_walkable(next) || occupied.contains(&next) {
                continue;
            }

            visited.insert(next);
            came_from.insert(next, pos);

            if next == goal {
                return Some(reconstruct(start, goal, dist + 1, &came_from));
            }
            queue.push_back((next, dist + 1));
        }
    }

    None
}

/// Orthogonal neighbours in up/down/left/right order. Squares off the
/// low edge saturate to 0, which is out of bounds and filtered by the
/// walkability check.
fn neighbours(pos: Square) -> [Square; 4] {
    [
        Square::new(pos.col, pos.row.wrapping_sub(1)),
        Square::new(pos.col, pos.row + 1),
        Square::new(pos.col.wrapping_sub(1), pos.row),
        Square::new(pos.col + 1, pos.row),
    ]
}

fn reconstruct(
    start: Square,
    goal: Square,
    distance: u32,
    came_from: &HashMap<Square, Square>,
) -> Path {
    let mut squares = vec![goal];
    let mut current = goal;
    while current != start {
        // Every square on the route was inserted into the map when first
        // reached, so the walk back always terminates at `start`.
        if let Some(&prev) = came_from.get(&current) {
            squares.push(prev);
            current = prev;
        } else {
            break;
        }
    }
    squares.reverse();
    Path { distance, squares }
}

// =========================================================================
// Tests
// =========================================================================
