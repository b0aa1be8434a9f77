//! The live game: dice, movement, suggestions, disproof, accusations.
//!
//! A [`Game`] exists from the deal to the win. It owns the envelope, the
//! hands, the pawn and weapon maps, and the turn machinery, and it is
//! completely synchronous: every entry point takes the acting player,
//! mutates state, and returns the events to fan out (or a [`Rejection`]
//! to send back to the sender alone).
//!
//! The turn order is fixed at the deal. The disproof walk, however, runs
//! over a queue snapshotted at suggestion time, so players leaving
//! mid-walk cannot reshuffle who is asked next; departed candidates are
//! simply skipped (or pass implicitly if the walk is waiting on them).

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use sleuth_board::{
    assign_suspects, deal, validate_move, Board, Card, Dealt, MoveTarget, PawnPosition,
    RoomId, Solution, Suspect, Weapon,
};
use sleuth_protocol::{
    PlayerId, Recipient, SeatSummary, ServerEvent, SuggestionRecap, TurnPhase,
};

use crate::error::Rejection;
use crate::session::Player;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// One player's standing in the running game.
#[derive(Debug)]
struct Seat {
    name: String,
    character: Suspect,
    hand: Vec<Card>,
    /// Made a false accusation. Still seated, still disproves, never
    /// takes another turn.
    eliminated: bool,
    /// A suggestion pulled this player's pawn into a room since their
    /// last turn; they may stay put instead of rolling.
    summoned: bool,
}

/// A suggestion waiting to be disproved.
///
/// `queue` is the candidates in turn order starting to the suggester's
/// left, snapshotted when the suggestion was made. `cursor` is the
/// candidate currently being asked.
#[derive(Debug)]
struct Disproof {
    suggester: PlayerId,
    suggester_name: String,
    suspect: Suspect,
    weapon: Weapon,
    room: RoomId,
    queue: Vec<PlayerId>,
    cursor: usize,
}

/// A dealt, in-progress game.
///
/// `pawns` and `weapons` are total maps: every suspect pawn is on the
/// board even when nobody plays it, and every weapon sits in some room.
#[derive(Debug)]
pub struct Game {
    turn_order: Vec<PlayerId>,
    seats: HashMap<PlayerId, Seat>,
    pawns: HashMap<Suspect, PawnPosition>,
    weapons: HashMap<Weapon, RoomId>,
    solution: Solution,
    /// Index into `turn_order`.
    current: usize,
    phase: TurnPhase,
    dice: Option<u8>,
    pending: Option<Disproof>,
    winner: Option<PlayerId>,
}

impl Game {
    /// Deals a new game for the given roster and returns it along with
    /// one private `GameStarted` event per player.
    ///
    /// Characters are assigned in roster order, the turn order is
    /// shuffled, hands are dealt along it, and finally whoever drew Miss
    /// Scarlett is moved to the front: she opens the game whenever she
    /// is played at all.
    pub(crate) fn start(
        roster: &[Player],
        rng: &mut impl Rng,
    ) -> (Self, Vec<(Recipient, ServerEvent)>) {
        let board = Board::get();

        let characters = assign_suspects(roster.len(), rng);
        let mut seats: HashMap<PlayerId, Seat> = roster
            .iter()
            .zip(characters)
            .map(|(player, character)| {
                let seat = Seat {
                    name: player.name.clone(),
                    character,
                    hand: Vec::new(),
                    eliminated: false,
                    summoned: false,
                };
                (player.id, seat)
            })
            .collect();

        let mut turn_order: Vec<PlayerId> = roster.iter().map(|p| p.id).collect();
        turn_order.shuffle(rng);

        let Dealt { solution, hands } = deal(roster.len(), rng);
        for (hand, id) in hands.into_iter().zip(&turn_order) {
            if let Some(seat) = seats.get_mut(id) {
                seat.hand = hand;
            }
        }

        if let Some(pos) = turn_order
            .iter()
            .position(|id| seats[id].character == Suspect::Scarlett)
        {
            let opener = turn_order.remove(pos);
            turn_order.insert(0, opener);
        }

        let pawns = Suspect::ALL
            .iter()
            .map(|&s| (s, PawnPosition::At(board.starting_square(s))))
            .collect();
        let weapons = Weapon::ALL
            .iter()
            .map(|&w| (w, board.initial_weapon_room(w)))
            .collect();

        let game = Game {
            turn_order,
            seats,
            pawns,
            weapons,
            solution,
            current: 0,
            phase: TurnPhase::Roll,
            dice: None,
            pending: None,
            winner: None,
        };

        let players = game.seat_summaries();
        let events = game
            .turn_order
            .iter()
            .map(|&id| {
                let seat = &game.seats[&id];
                let started = ServerEvent::GameStarted {
                    players: players.clone(),
                    your_character: seat.character,
                    your_cards: seat.hand.clone(),
                    pawns: game.pawns.clone(),
                    weapons: game.weapons.clone(),
                    current_turn: game.turn_order[0],
                    turn_phase: TurnPhase::Roll,
                };
                (Recipient::Player(id), started)
            })
            .collect();

        (game, events)
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// The player whose turn it is.
    pub fn current_turn(&self) -> PlayerId {
        self.turn_order[self.current]
    }

    /// Where the current player's turn stands.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Set once somebody has won; the game takes no further commands
    /// after that (the session moves on to the finished stage).
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The envelope.
    pub fn solution(&self) -> Solution {
        self.solution
    }

    /// The cards a seated player holds.
    pub fn hand(&self, id: PlayerId) -> Option<&[Card]> {
        self.seats.get(&id).map(|s| s.hand.as_slice())
    }

    /// The suspect a seated player controls.
    pub fn character(&self, id: PlayerId) -> Option<Suspect> {
        self.seats.get(&id).map(|s| s.character)
    }

    /// Where a seated player's pawn is.
    pub fn position(&self, id: PlayerId) -> Option<PawnPosition> {
        let character = self.character(id)?;
        self.pawns.get(&character).copied()
    }

    /// Whether a seated player has been knocked out by a false
    /// accusation.
    pub fn is_eliminated(&self, id: PlayerId) -> bool {
        self.seats.get(&id).is_some_and(|s| s.eliminated)
    }

    /// Live pawn positions, keyed by suspect.
    pub fn pawns(&self) -> &HashMap<Suspect, PawnPosition> {
        &self.pawns
    }

    /// Live weapon locations, keyed by weapon.
    pub fn weapons(&self) -> &HashMap<Weapon, RoomId> {
        &self.weapons
    }

    /// The roster with characters, in turn order.
    pub(crate) fn seat_summaries(&self) -> Vec<SeatSummary> {
        self.turn_order
            .iter()
            .map(|&id| {
                let seat = &self.seats[&id];
                SeatSummary {
                    id,
                    name: seat.name.clone(),
                    character: seat.character,
                }
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Turn actions
    // -----------------------------------------------------------------------

    pub(crate) fn roll_dice(
        &mut self,
        sender: PlayerId,
        rng: &mut impl Rng,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.phase != TurnPhase::Roll {
            return Err(Rejection::CannotRollNow);
        }

        let die1: u8 = rng.random_range(1..=6);
        let die2: u8 = rng.random_range(1..=6);
        let result = die1 + die2;
        self.dice = Some(result);
        self.phase = TurnPhase::Move;

        Ok(vec![(
            Recipient::All,
            ServerEvent::DiceRolled {
                player_id: sender,
                player_name: self.name(sender),
                result,
            },
        )])
    }

    pub(crate) fn move_pawn(
        &mut self,
        sender: PlayerId,
        target: MoveTarget,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.phase != TurnPhase::Move {
            return Err(Rejection::CannotMoveNow);
        }
        let rolled = self.dice.ok_or(Rejection::CannotMoveNow)?;

        let character = self.seat(sender)?.character;
        let from = self.pawns[&character];
        let valid = validate_move(Board::get(), &from, target, rolled, &self.pawns, character)?;

        // Walking out of a room and straight back in would let a player
        // suggest in the same room every turn.
        if valid.entered_room.is_some() && valid.entered_room == from.room() {
            return Err(Rejection::SameRoom);
        }

        self.pawns.insert(character, valid.position);
        let entered = valid.entered_room;
        self.phase = if entered.is_some() {
            TurnPhase::Suggest
        } else {
            TurnPhase::End
        };

        Ok(vec![
            (
                Recipient::All,
                ServerEvent::PawnMoved {
                    player_id: sender,
                    player_name: self.name(sender),
                    character,
                    new_position: valid.position,
                    entered_room: entered,
                    used_secret_passage: false,
                    walked: valid.walked,
                },
            ),
            (
                Recipient::All,
                ServerEvent::TurnPhaseChanged {
                    player_id: sender,
                    phase: self.phase,
                    room: entered,
                },
            ),
        ])
    }

    pub(crate) fn use_secret_passage(
        &mut self,
        sender: PlayerId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.phase != TurnPhase::Roll {
            return Err(Rejection::CannotUsePassageNow);
        }

        let character = self.seat(sender)?.character;
        let room = self.pawns[&character]
            .room()
            .ok_or(Rejection::NotInRoom)?;
        let passage = Board::get().room(room).passage().ok_or(Rejection::NoPassage)?;
        let destination = passage.to;

        self.pawns
            .insert(character, PawnPosition::InRoom { room: destination });
        self.phase = TurnPhase::Suggest;

        Ok(vec![
            (
                Recipient::All,
                ServerEvent::PawnMoved {
                    player_id: sender,
                    player_name: self.name(sender),
                    character,
                    new_position: PawnPosition::InRoom { room: destination },
                    entered_room: Some(destination),
                    used_secret_passage: true,
                    walked: Vec::new(),
                },
            ),
            (
                Recipient::All,
                ServerEvent::TurnPhaseChanged {
                    player_id: sender,
                    phase: TurnPhase::Suggest,
                    room: Some(destination),
                },
            ),
        ])
    }

    /// Skip the dice and suggest again in the current room. Only allowed
    /// while the summons from another player's suggestion is unspent.
    pub(crate) fn stay_put(
        &mut self,
        sender: PlayerId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.phase != TurnPhase::Roll {
            return Err(Rejection::CannotStayPutNow);
        }

        let seat = self.seat(sender)?;
        let summoned = seat.summoned;
        let room = self.pawns[&seat.character]
            .room()
            .ok_or(Rejection::StayPutNeedsRoom)?;
        if !summoned {
            return Err(Rejection::NotSummoned);
        }

        self.phase = TurnPhase::Suggest;
        Ok(vec![(
            Recipient::All,
            ServerEvent::TurnPhaseChanged {
                player_id: sender,
                phase: TurnPhase::Suggest,
                room: Some(room),
            },
        )])
    }

    pub(crate) fn make_suggestion(
        &mut self,
        sender: PlayerId,
        suspect: Suspect,
        weapon: Weapon,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.phase != TurnPhase::Suggest {
            return Err(Rejection::CannotSuggestNow);
        }

        let suggester = self.seat(sender)?;
        let suggester_name = suggester.name.clone();
        let room = self.pawns[&suggester.character]
            .room()
            .ok_or(Rejection::SuggestNeedsRoom)?;

        // The named suspect and weapon are pulled into the room.
        self.pawns.insert(suspect, PawnPosition::InRoom { room });
        self.weapons.insert(weapon, room);

        // If another player runs that suspect, they arrive with their
        // pawn and earn the right to stay put on their next turn.
        let mut summoned_player = None;
        for (&id, seat) in self.seats.iter_mut() {
            if id != sender && seat.character == suspect {
                seat.summoned = true;
                summoned_player = Some(id);
            }
        }

        // Candidates answer in turn order, starting left of the
        // suggester. Eliminated players still hold cards and still
        // answer.
        let len = self.turn_order.len();
        let queue = (1..len)
            .map(|offset| self.turn_order[(self.current + offset) % len])
            .collect();
        self.pending = Some(Disproof {
            suggester: sender,
            suggester_name: suggester_name.clone(),
            suspect,
            weapon,
            room,
            queue,
            cursor: 0,
        });

        let mut events = vec![(
            Recipient::All,
            ServerEvent::SuggestionMade {
                player_id: sender,
                player_name: suggester_name,
                suspect,
                weapon,
                room,
                pawns: self.pawns.clone(),
                weapons: self.weapons.clone(),
                summoned_player,
            },
        )];
        events.extend(self.advance_disproof());
        Ok(events)
    }

    pub(crate) fn show_card(
        &mut self,
        sender: PlayerId,
        card: Card,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        let pending = self
            .pending
            .as_ref()
            .ok_or(Rejection::NoPendingSuggestion)?;
        if pending.queue.get(pending.cursor) != Some(&sender) {
            return Err(Rejection::NotYourDisprove);
        }
        let suggester = pending.suggester;
        let suggester_name = pending.suggester_name.clone();
        let matches = card == Card::Suspect(pending.suspect)
            || card == Card::Weapon(pending.weapon)
            || card == Card::Room(pending.room);

        let seat = self.seat(sender)?;
        if !seat.hand.contains(&card) {
            return Err(Rejection::CardNotHeld);
        }
        if !matches {
            return Err(Rejection::CardNotMatching);
        }
        let shower_name = seat.name.clone();

        self.pending = None;
        self.phase = TurnPhase::End;

        Ok(vec![
            (
                Recipient::Player(suggester),
                ServerEvent::CardShownToYou {
                    shower_id: sender,
                    shower_name: shower_name.clone(),
                    card,
                },
            ),
            (
                Recipient::AllExcept(sender),
                ServerEvent::CardShown {
                    shower_id: sender,
                    shower_name,
                    suggester_id: suggester,
                    suggester_name,
                },
            ),
            (
                Recipient::All,
                ServerEvent::TurnPhaseChanged {
                    player_id: suggester,
                    phase: TurnPhase::End,
                    room: None,
                },
            ),
        ])
    }

    pub(crate) fn cannot_disprove(
        &mut self,
        sender: PlayerId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        let (suspect, weapon, room) = {
            let pending = self
                .pending
                .as_ref()
                .ok_or(Rejection::NoPendingSuggestion)?;
            if pending.queue.get(pending.cursor) != Some(&sender) {
                return Err(Rejection::NotYourDisprove);
            }
            let seat = self.seat(sender)?;
            if !matching_cards(&seat.hand, pending.suspect, pending.weapon, pending.room)
                .is_empty()
            {
                return Err(Rejection::MustShowCard);
            }
            (pending.suspect, pending.weapon, pending.room)
        };

        let mut events = vec![(
            Recipient::All,
            ServerEvent::PlayerCannotDisprove {
                player_id: sender,
                player_name: self.name(sender),
                suspect,
                weapon,
                room,
            },
        )];
        if let Some(pending) = self.pending.as_mut() {
            pending.cursor += 1;
        }
        events.extend(self.advance_disproof());
        Ok(events)
    }

    pub(crate) fn make_accusation(
        &mut self,
        sender: PlayerId,
        suspect: Suspect,
        weapon: Weapon,
        room: RoomId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.pending.is_some() {
            return Err(Rejection::DisproofPending);
        }
        let seat = self.seat(sender)?;
        if seat.eliminated {
            return Err(Rejection::AlreadyAccused);
        }
        let accuser_name = seat.name.clone();

        if self.solution.matches(suspect, weapon, room) {
            self.winner = Some(sender);
            return Ok(vec![(
                Recipient::All,
                ServerEvent::GameWon {
                    winner_id: sender,
                    winner_name: accuser_name,
                    solution: self.solution,
                    by_elimination: false,
                },
            )]);
        }

        // Wrong. The accuser is out of the running but keeps their seat
        // and their cards for disproving.
        if let Some(seat) = self.seats.get_mut(&sender) {
            seat.eliminated = true;
        }
        let mut events = vec![(
            Recipient::All,
            ServerEvent::WrongAccusation {
                player_id: sender,
                player_name: accuser_name,
                suspect,
                weapon,
                room,
            },
        )];

        if let [last] = self.active_players()[..] {
            self.winner = Some(last);
            events.push((
                Recipient::All,
                ServerEvent::GameWon {
                    winner_id: last,
                    winner_name: self.name(last),
                    solution: self.solution,
                    by_elimination: true,
                },
            ));
            return Ok(events);
        }

        events.extend(self.finish_turn());
        Ok(events)
    }

    pub(crate) fn end_turn(
        &mut self,
        sender: PlayerId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        self.require_turn(sender)?;
        if self.phase == TurnPhase::Suggest {
            return Err(Rejection::SuggestFirst);
        }
        Ok(self.finish_turn())
    }

    // -----------------------------------------------------------------------
    // Departures
    // -----------------------------------------------------------------------

    /// Removes a departed player mid-game.
    ///
    /// Unwedges the three spots a departure can stall the game: the
    /// disproof walk waiting on them (implicit pass), the turn being
    /// theirs (forced turn change to their successor), and the field
    /// thinning to a single detective (who wins on the spot).
    pub(crate) fn remove_player(&mut self, id: PlayerId) -> Vec<(Recipient, ServerEvent)> {
        let Some(index) = self.turn_order.iter().position(|&p| p == id) else {
            return Vec::new();
        };
        let name = self.name(id);
        let was_current = index == self.current;

        self.turn_order.remove(index);
        self.seats.remove(&id);
        if self.turn_order.is_empty() {
            return Vec::new();
        }
        if index < self.current {
            self.current -= 1;
        } else if self.current >= self.turn_order.len() {
            self.current = 0;
        }

        let mut events = Vec::new();

        // A departed disprover passes implicitly. (A departed suggester
        // instead falls through to the forced turn change, which drops
        // the whole suggestion.)
        let at_cursor = self
            .pending
            .as_ref()
            .is_some_and(|p| p.suggester != id && p.queue.get(p.cursor) == Some(&id));
        if at_cursor {
            if let Some(pending) = self.pending.as_mut() {
                events.push((
                    Recipient::All,
                    ServerEvent::PlayerCannotDisprove {
                        player_id: id,
                        player_name: name,
                        suspect: pending.suspect,
                        weapon: pending.weapon,
                        room: pending.room,
                    },
                ));
                pending.cursor += 1;
            }
            events.extend(self.advance_disproof());
        }

        if let [last] = self.active_players()[..] {
            self.winner = Some(last);
            self.pending = None;
            events.push((
                Recipient::All,
                ServerEvent::GameWon {
                    winner_id: last,
                    winner_name: self.name(last),
                    solution: self.solution,
                    by_elimination: true,
                },
            ));
            return events;
        }

        if was_current {
            // The removal already shifted `current` onto the successor;
            // reset the turn state without advancing again.
            self.dice = None;
            self.pending = None;
            self.phase = TurnPhase::Roll;
            for _ in 0..self.turn_order.len() {
                let seated = self.current_turn();
                if self.seats.get(&seated).is_some_and(|s| !s.eliminated) {
                    break;
                }
                self.current = (self.current + 1) % self.turn_order.len();
            }
            let next = self.current_turn();
            events.push((
                Recipient::All,
                ServerEvent::TurnChanged {
                    current_turn: next,
                    current_turn_name: self.name(next),
                    turn_phase: TurnPhase::Roll,
                },
            ));
        }

        events
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require_turn(&self, sender: PlayerId) -> Result<(), Rejection> {
        if !self.seats.contains_key(&sender) {
            return Err(Rejection::NotSeated);
        }
        if self.current_turn() != sender {
            return Err(Rejection::NotYourTurn);
        }
        Ok(())
    }

    fn seat(&self, id: PlayerId) -> Result<&Seat, Rejection> {
        self.seats.get(&id).ok_or(Rejection::NotSeated)
    }

    fn name(&self, id: PlayerId) -> String {
        self.seats
            .get(&id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    }

    fn active_players(&self) -> Vec<PlayerId> {
        self.turn_order
            .iter()
            .copied()
            .filter(|id| self.seats.get(id).is_some_and(|s| !s.eliminated))
            .collect()
    }

    /// Walks the disproof queue to the next candidate still in the game
    /// and prompts them, or settles the suggestion as undisproved when
    /// the queue runs out.
    fn advance_disproof(&mut self) -> Vec<(Recipient, ServerEvent)> {
        let Some(mut pending) = self.pending.take() else {
            return Vec::new();
        };

        while let Some(&candidate) = pending.queue.get(pending.cursor) {
            let Some(seat) = self.seats.get(&candidate) else {
                pending.cursor += 1;
                continue;
            };

            let matching =
                matching_cards(&seat.hand, pending.suspect, pending.weapon, pending.room);
            let prompt = ServerEvent::YourTurnToDisprove {
                suggestion: SuggestionRecap {
                    suggester_id: pending.suggester,
                    suggester_name: pending.suggester_name.clone(),
                    suspect: pending.suspect,
                    weapon: pending.weapon,
                    room: pending.room,
                },
                can_disprove: !matching.is_empty(),
                matching_cards: matching,
            };
            let waiting = ServerEvent::WaitingForDisprove {
                disprover_id: candidate,
                disprover_name: seat.name.clone(),
            };
            self.pending = Some(pending);
            return vec![
                (Recipient::Player(candidate), prompt),
                (Recipient::AllExcept(candidate), waiting),
            ];
        }

        // Nobody could disprove; the suggester acts on that.
        let suggester = pending.suggester;
        self.phase = TurnPhase::End;
        vec![
            (
                Recipient::All,
                ServerEvent::SuggestionNotDisproved {
                    suggester_id: suggester,
                    suggester_name: pending.suggester_name,
                },
            ),
            (
                Recipient::All,
                ServerEvent::TurnPhaseChanged {
                    player_id: suggester,
                    phase: TurnPhase::End,
                    room: None,
                },
            ),
        ]
    }

    /// Closes the current turn and hands it to the next player still in
    /// the running.
    fn finish_turn(&mut self) -> Vec<(Recipient, ServerEvent)> {
        let outgoing = self.current_turn();
        if let Some(seat) = self.seats.get_mut(&outgoing) {
            seat.summoned = false;
        }
        self.dice = None;
        self.pending = None;
        self.phase = TurnPhase::Roll;

        // Bounded so a field of only eliminated players cannot spin.
        for _ in 0..self.turn_order.len() {
            self.current = (self.current + 1) % self.turn_order.len();
            let id = self.current_turn();
            if self.seats.get(&id).is_some_and(|s| !s.eliminated) {
                break;
            }
        }

        let next = self.current_turn();
        vec![(
            Recipient::All,
            ServerEvent::TurnChanged {
                current_turn: next,
                current_turn_name: self.name(next),
                turn_phase: TurnPhase::Roll,
            },
        )]
    }
}

/// The cards in `hand` that can disprove the given suggestion.
fn matching_cards(hand: &[Card], suspect: Suspect, weapon: Weapon, room: RoomId) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|&card| {
            card == Card::Suspect(suspect)
                || card == Card::Weapon(weapon)
                || card == Card::Room(room)
        })
        .collect()
}

// =========================================================================
// Tests
// =========================================================================
