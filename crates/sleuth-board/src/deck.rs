//! Deck preparation: pick the solution, deal the rest.
//!
//! The deal follows the box rules. The three category piles are shuffled
//! separately and one card is drawn from each into the envelope; the
//! remaining eighteen are shuffled together and dealt round-robin, so
//! hand sizes never differ by more than one card.
//!
//! The RNG is a parameter everywhere. Production code hands in the room
//! task's OS-seeded generator; tests hand in a seeded one and get the
//! same deal every run.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Card, RoomId, Solution, Suspect, Weapon};

/// The outcome of a deal: the envelope cards plus one hand per player,
/// indexed by seating order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dealt {
    pub solution: Solution,
    pub hands: Vec<Vec<Card>>,
}

/// All 21 cards: 6 suspects, 6 weapons, 9 rooms.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(21);
    deck.extend(Suspect::ALL.map(Card::Suspect));
    deck.extend(Weapon::ALL.map(Card::Weapon));
    deck.extend(RoomId::ALL.map(Card::Room));
    deck
}

/// Shuffles, draws the solution, and deals the rest to `player_count`
/// hands. Earlier seats get the extra card when 18 doesn't divide evenly.
pub fn deal(player_count: usize, rng: &mut impl Rng) -> Dealt {
    let mut suspects = Suspect::ALL;
    let mut weapons = Weapon::ALL;
    let mut rooms = RoomId::ALL;
    suspects.shuffle(rng);
    weapons.shuffle(rng);
    rooms.shuffle(rng);

    // Last card of each shuffled pile goes into the envelope.
    let solution = Solution {
        suspect: suspects[5],
        weapon: weapons[5],
        room: rooms[8],
    };

    let mut remaining: Vec<Card> = suspects[..5]
        .iter()
        .copied()
        .map(Card::Suspect)
        .chain(weapons[..5].iter().copied().map(Card::Weapon))
        .chain(rooms[..8].iter().copied().map(Card::Room))
        .collect();
    remaining.shuffle(rng);

    let mut hands = vec![Vec::new(); player_count];
    for (i, card) in remaining.into_iter().enumerate() {
        hands[i % player_count].push(card);
    }

    Dealt { solution, hands }
}

/// Picks which suspects the seated players control: a random draw of
/// `player_count` from the six, in random order. The undrawn suspects'
/// pawns still stand on the board.
pub fn assign_suspects(player_count: usize, rng: &mut impl Rng) -> Vec<Suspect> {
    let mut suspects = Suspect::ALL.to_vec();
    suspects.shuffle(rng);
    suspects.truncate(player_count);
    suspects
}

// =========================================================================
// Tests
// =========================================================================
