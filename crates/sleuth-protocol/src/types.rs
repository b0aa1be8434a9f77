//! Wire types for Sleuth's client protocol.
//!
//! Every message between the browser and the server is one JSON object
//! with a `"type"` tag in camelCase: commands ([`ClientCommand`]) flow
//! in, events ([`ServerEvent`]) flow out. There is no extra framing
//! beyond the WebSocket message itself; the socket already gives us
//! ordered, reliable delivery.
//!
//! Board vocabulary (squares, suspects, cards, positions) comes from
//! `sleuth_board` so the rules engine and the wire agree on one set of
//! identifiers.

use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use sleuth_board::{
    Card, MoveTarget, PawnPosition, RoomId, Solution, Square, Suspect, Weapon,
};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A server-assigned player identifier, stable for the life of the
/// player's connection and never reused within a room.
///
/// This is deliberately not the transport's connection id: game state
/// and events reference players, and nothing in the rules layer should
/// care what socket a player happens to be speaking through.
///
/// `#[serde(transparent)]` makes it a plain number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room code: the short number players share to meet in a room.
///
/// Codes are 1..=999. On the wire a code serializes as a plain number
/// but deserializes from either a number or a numeric string, because
/// clients read it out of a text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RoomCodeRepr", into = "u16")]
pub struct RoomCode(u16);

impl RoomCode {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 999;

    /// Validates the 1..=999 range.
    pub fn new(code: u16) -> Result<RoomCode, ProtocolError> {
        if (Self::MIN..=Self::MAX).contains(&code) {
            Ok(RoomCode(code))
        } else {
            Err(ProtocolError::InvalidRoomCode(code.to_string()))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

impl FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map_err(|_| ProtocolError::InvalidRoomCode(s.to_string()))
            .and_then(RoomCode::new)
    }
}

impl From<RoomCode> for u16 {
    fn from(code: RoomCode) -> u16 {
        code.0
    }
}

/// Accepts both `42` and `"42"` when deserializing a room code.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoomCodeRepr {
    Number(u16),
    Text(String),
}

impl TryFrom<RoomCodeRepr> for RoomCode {
    type Error = ProtocolError;

    fn try_from(repr: RoomCodeRepr) -> Result<Self, Self::Error> {
        match repr {
            RoomCodeRepr::Number(n) => RoomCode::new(n),
            RoomCodeRepr::Text(s) => s.parse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an event?
// ---------------------------------------------------------------------------

/// Delivery target for one server event.
///
/// Game handling returns `(Recipient, ServerEvent)` pairs and the room
/// task fans them out. Most events go to everyone; the disproof flow is
/// where the private variants earn their keep (a shown card must reach
/// only the suggester).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Everyone except the specified player.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Whether an event with this recipient should be delivered to
    /// `player`.
    pub fn includes(&self, player: PlayerId) -> bool {
        match self {
            Recipient::All => true,
            Recipient::Player(p) => *p == player,
            Recipient::AllExcept(p) => *p != player,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared fragments
// ---------------------------------------------------------------------------

/// Where a turn currently stands for the player whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPhase {
    /// Waiting on the dice (or a secret passage / stay-put choice).
    Roll,
    /// Dice rolled, waiting on a move.
    Move,
    /// In a room after moving; a suggestion is required.
    Suggest,
    /// Everything done; waiting on end-turn (or an accusation).
    End,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnPhase::Roll => "roll",
            TurnPhase::Move => "move",
            TurnPhase::Suggest => "suggest",
            TurnPhase::End => "end",
        };
        f.write_str(s)
    }
}

/// A lobby roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
}

/// A roster entry once a game is running, with the suspect the player
/// controls. Hands are never in here; each player learns only their own
/// hand, in their private copy of [`ServerEvent::GameStarted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub id: PlayerId,
    pub name: String,
    pub character: Suspect,
}

/// The suggestion a disprover is being asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecap {
    pub suggester_id: PlayerId,
    pub suggester_name: String,
    pub suspect: Suspect,
    pub weapon: Weapon,
    pub room: RoomId,
}

// ---------------------------------------------------------------------------
// Client → server commands
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// `#[serde(tag = "type")]` with camelCase renames produces the wire
/// shape `{"type": "rollDice"}` / `{"type": "join", "name": ...}`.
/// Commands that arrive out of turn or out of phase are answered with a
/// targeted [`ServerEvent::Error`]; decoding itself only fails on
/// unknown tags or malformed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Enter a room (creating it if the code is unused). Must be the
    /// first command on a connection.
    Join { name: String, room_code: RoomCode },

    /// Host only, lobby only: deal and begin.
    StartGame,

    /// Roll the two dice.
    RollDice,

    /// Move to a hallway square or into a room.
    MovePawn { target: MoveTarget },

    /// Take the secret passage from a corner room; skips the dice.
    UseSecretPassage,

    /// Stay in the current room (only after having been summoned there
    /// by another player's suggestion); skips the dice.
    StayPut,

    /// Suggest suspect + weapon in the room the player stands in.
    MakeSuggestion { suspect: Suspect, weapon: Weapon },

    /// Disprove the pending suggestion with this card.
    ShowCard { card: Card },

    /// Pass on disproving the pending suggestion.
    CannotDisprove,

    /// Accuse. Correct ends the game; wrong eliminates the accuser.
    MakeAccusation {
        suspect: Suspect,
        weapon: Weapon,
        room: RoomId,
    },

    /// Finish the turn.
    EndTurn,

    /// Acknowledge the end-of-game screen.
    CloseWinModal,

    /// Host only: reset to the lobby with the same roster.
    StartNewGame,

    /// Host only: close the room instead of playing again.
    DeclineNewGame,
}

// ---------------------------------------------------------------------------
// Server → client events
// ---------------------------------------------------------------------------

/// Everything the server tells clients.
///
/// Same tagging scheme as [`ClientCommand`]. Events are facts, not
/// requests: by the time one is emitted the state change has already
/// been applied, and every recipient can render it without asking
/// anything back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Join acknowledgement, telling the new player their id. Sent only
    /// to them, immediately before the roster broadcast.
    Joined {
        player_id: PlayerId,
        room_code: RoomCode,
    },

    /// The lobby roster changed.
    RoomUpdate {
        players: Vec<PlayerSummary>,
        host_id: PlayerId,
        room_code: RoomCode,
    },

    /// The game began. Each player receives their own copy: the shared
    /// board state is identical, `your_*` fields are private.
    GameStarted {
        players: Vec<SeatSummary>,
        your_character: Suspect,
        your_cards: Vec<Card>,
        pawns: HashMap<Suspect, PawnPosition>,
        weapons: HashMap<Weapon, RoomId>,
        current_turn: PlayerId,
        turn_phase: TurnPhase,
    },

    /// The current player rolled.
    DiceRolled {
        player_id: PlayerId,
        player_name: String,
        result: u8,
    },

    /// A pawn moved: by dice, or instantly via a secret passage.
    PawnMoved {
        player_id: PlayerId,
        player_name: String,
        character: Suspect,
        new_position: PawnPosition,
        entered_room: Option<RoomId>,
        used_secret_passage: bool,
        /// Hallway squares traversed, for walk animation. Empty for
        /// secret passages.
        walked: Vec<Square>,
    },

    /// The current player's turn moved to a new phase. `room` is set
    /// when the phase is `suggest` (the room to suggest in).
    TurnPhaseChanged {
        player_id: PlayerId,
        phase: TurnPhase,
        room: Option<RoomId>,
    },

    /// A suggestion was made. Carries the refreshed pawn and weapon maps
    /// since the named suspect and weapon teleport into the room.
    SuggestionMade {
        player_id: PlayerId,
        player_name: String,
        suspect: Suspect,
        weapon: Weapon,
        room: RoomId,
        pawns: HashMap<Suspect, PawnPosition>,
        weapons: HashMap<Weapon, RoomId>,
        /// Set when the suggested suspect is another player's character:
        /// that player has been pulled into the room.
        summoned_player: Option<PlayerId>,
    },

    /// Private: you are the next candidate to disprove. `matching_cards`
    /// are the cards in your hand that match the suggestion; empty means
    /// you can only pass.
    YourTurnToDisprove {
        suggestion: SuggestionRecap,
        matching_cards: Vec<Card>,
        can_disprove: bool,
    },

    /// Everyone else: who the suggestion is waiting on.
    WaitingForDisprove {
        disprover_id: PlayerId,
        disprover_name: String,
    },

    /// Private to the suggester: the disprover showed you this card.
    CardShownToYou {
        shower_id: PlayerId,
        shower_name: String,
        card: Card,
    },

    /// Everyone but the disprover: a card was shown, but not which.
    /// (The suggester also receives [`ServerEvent::CardShownToYou`].)
    CardShown {
        shower_id: PlayerId,
        shower_name: String,
        suggester_id: PlayerId,
        suggester_name: String,
    },

    /// A candidate had nothing to show (or passed).
    PlayerCannotDisprove {
        player_id: PlayerId,
        player_name: String,
        suspect: Suspect,
        weapon: Weapon,
        room: RoomId,
    },

    /// Every candidate passed; the suggestion stands undisproved.
    SuggestionNotDisproved {
        suggester_id: PlayerId,
        suggester_name: String,
    },

    /// The turn passed to the next player.
    TurnChanged {
        current_turn: PlayerId,
        current_turn_name: String,
        turn_phase: TurnPhase,
    },

    /// An accusation missed; the accuser is out of the running but
    /// keeps disproving with their cards.
    WrongAccusation {
        player_id: PlayerId,
        player_name: String,
        suspect: Suspect,
        weapon: Weapon,
        room: RoomId,
    },

    /// The game is over, by a correct accusation or because everyone
    /// else eliminated themselves. The envelope is finally public.
    GameWon {
        winner_id: PlayerId,
        winner_name: String,
        solution: Solution,
        by_elimination: bool,
    },

    /// A player's connection dropped. `new_host_id` is set when the
    /// departure transferred the host seat.
    PlayerDisconnected {
        player_id: PlayerId,
        player_name: String,
        new_host_id: Option<PlayerId>,
    },

    /// Private to the host: everyone has dismissed the end screen;
    /// offer a rematch.
    PromptNewGame,

    /// The host chose a rematch; the room is a lobby again with the
    /// same roster.
    ReturnToLobby {
        players: Vec<PlayerSummary>,
        host_id: PlayerId,
        room_code: RoomCode,
    },

    /// The host declined a rematch; the room is closing.
    GameEnded,

    /// Targeted rejection of the sender's last command. Never
    /// broadcast.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests. The browser client pattern-matches on the
    //! `"type"` tags and camelCase field names below; these tests keep
    //! the serde attributes honest.

    use super::*;

    fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&PlayerId(42)).unwrap(), "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_code_accepts_number_and_string() {
        let from_number: RoomCode = serde_json::from_str("42").unwrap();
        let from_string: RoomCode = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.get(), 42);
    }

    #[test]
    fn test_room_code_serializes_as_plain_number() {
        let code = RoomCode::new(999).unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "999");
    }

    #[test]
    fn test_room_code_rejects_out_of_range() {
        assert!(RoomCode::new(0).is_err());
        assert!(RoomCode::new(1000).is_err());
        let zero: Result<RoomCode, _> = serde_json::from_str("0");
        assert!(zero.is_err());
        let big: Result<RoomCode, _> = serde_json::from_str("\"1000\"");
        assert!(big.is_err());
    }

    #[test]
    fn test_room_code_rejects_non_numeric_text() {
        let result: Result<RoomCode, _> = serde_json::from_str("\"lobby\"");
        assert!(result.is_err());
        assert!("lobby".parse::<RoomCode>().is_err());
    }

    #[test]
    fn test_room_code_parses_with_whitespace() {
        let code: RoomCode = " 7 ".parse().unwrap();
        assert_eq!(code.get(), 7);
    }

    // =====================================================================
    // Recipient
    // =====================================================================

    #[test]
    fn test_recipient_includes() {
        let a = PlayerId(1);
        let b = PlayerId(2);
        assert!(Recipient::All.includes(a));
        assert!(Recipient::Player(a).includes(a));
        assert!(!Recipient::Player(a).includes(b));
        assert!(!Recipient::AllExcept(a).includes(a));
        assert!(Recipient::AllExcept(a).includes(b));
    }

    // =====================================================================
    // TurnPhase
    // =====================================================================

    #[test]
    fn test_turn_phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TurnPhase::Roll).unwrap(), "\"roll\"");
        assert_eq!(
            serde_json::to_string(&TurnPhase::Suggest).unwrap(),
            "\"suggest\""
        );
    }

    // =====================================================================
    // ClientCommand wire shapes
    // =====================================================================

    #[test]
    fn test_join_command_json_format() {
        let json = r#"{"type": "join", "name": "Ada", "roomCode": "7"}"#;
        let cmd: ClientCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::Join {
                name: "Ada".into(),
                room_code: RoomCode::new(7).unwrap(),
            }
        );
    }

    #[test]
    fn test_unit_commands_are_bare_tags() {
        for (cmd, tag) in [
            (ClientCommand::StartGame, "startGame"),
            (ClientCommand::RollDice, "rollDice"),
            (ClientCommand::UseSecretPassage, "useSecretPassage"),
            (ClientCommand::StayPut, "stayPut"),
            (ClientCommand::CannotDisprove, "cannotDisprove"),
            (ClientCommand::EndTurn, "endTurn"),
            (ClientCommand::CloseWinModal, "closeWinModal"),
            (ClientCommand::StartNewGame, "startNewGame"),
            (ClientCommand::DeclineNewGame, "declineNewGame"),
        ] {
            let json = to_json(&cmd);
            assert_eq!(json, serde_json::json!({"type": tag}));
        }
    }

    #[test]
    fn test_move_pawn_accepts_square_and_room_targets() {
        let square: ClientCommand =
            serde_json::from_str(r#"{"type": "movePawn", "target": {"col": 8, "row": 9}}"#)
                .unwrap();
        assert_eq!(
            square,
            ClientCommand::MovePawn {
                target: MoveTarget::Square(Square::new(8, 9)),
            }
        );

        let room: ClientCommand =
            serde_json::from_str(r#"{"type": "movePawn", "target": {"room": "library"}}"#)
                .unwrap();
        assert_eq!(
            room,
            ClientCommand::MovePawn {
                target: MoveTarget::Room { room: RoomId::Library },
            }
        );
    }

    #[test]
    fn test_make_suggestion_json_format() {
        let json = r#"{"type": "makeSuggestion", "suspect": "plum", "weapon": "rope"}"#;
        let cmd: ClientCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::MakeSuggestion {
                suspect: Suspect::Plum,
                weapon: Weapon::Rope,
            }
        );
    }

    #[test]
    fn test_show_card_json_format() {
        let json = r#"{"type": "showCard", "card": {"type": "weapon", "id": "rope"}}"#;
        let cmd: ClientCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::ShowCard {
                card: Card::Weapon(Weapon::Rope),
            }
        );
    }

    #[test]
    fn test_make_accusation_json_format() {
        let json = serde_json::json!({
            "type": "makeAccusation",
            "suspect": "scarlett",
            "weapon": "knife",
            "room": "ballroom",
        });
        let cmd: ClientCommand = serde_json::from_value(json).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::MakeAccusation {
                suspect: Suspect::Scarlett,
                weapon: Weapon::Knife,
                room: RoomId::Ballroom,
            }
        );
    }

    #[test]
    fn test_unknown_command_type_fails_to_decode() {
        let json = r#"{"type": "castSpell", "spell": "fireball"}"#;
        let result: Result<ClientCommand, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerEvent wire shapes
    // =====================================================================

    #[test]
    fn test_joined_event_json_format() {
        let event = ServerEvent::Joined {
            player_id: PlayerId(3),
            room_code: RoomCode::new(42).unwrap(),
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "joined");
        assert_eq!(json["playerId"], 3);
        assert_eq!(json["roomCode"], 42);
    }

    #[test]
    fn test_room_update_json_format() {
        let event = ServerEvent::RoomUpdate {
            players: vec![
                PlayerSummary { id: PlayerId(1), name: "Ada".into() },
                PlayerSummary { id: PlayerId(2), name: "Bo".into() },
            ],
            host_id: PlayerId(1),
            room_code: RoomCode::new(7).unwrap(),
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "roomUpdate");
        assert_eq!(json["hostId"], 1);
        assert_eq!(json["players"][1]["name"], "Bo");
    }

    #[test]
    fn test_game_started_uses_camel_case_fields() {
        let event = ServerEvent::GameStarted {
            players: vec![SeatSummary {
                id: PlayerId(1),
                name: "Ada".into(),
                character: Suspect::Scarlett,
            }],
            your_character: Suspect::Scarlett,
            your_cards: vec![Card::Room(RoomId::Hall)],
            pawns: HashMap::new(),
            weapons: HashMap::new(),
            current_turn: PlayerId(1),
            turn_phase: TurnPhase::Roll,
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "gameStarted");
        assert_eq!(json["yourCharacter"], "scarlett");
        assert_eq!(json["yourCards"][0]["id"], "hall");
        assert_eq!(json["currentTurn"], 1);
        assert_eq!(json["turnPhase"], "roll");
        assert_eq!(json["players"][0]["character"], "scarlett");
    }

    #[test]
    fn test_pawn_moved_json_format() {
        let event = ServerEvent::PawnMoved {
            player_id: PlayerId(5),
            player_name: "Cy".into(),
            character: Suspect::Green,
            new_position: PawnPosition::InRoom { room: RoomId::Kitchen },
            entered_room: Some(RoomId::Kitchen),
            used_secret_passage: false,
            walked: vec![Square::new(20, 18)],
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "pawnMoved");
        assert_eq!(json["newPosition"], serde_json::json!({"room": "kitchen"}));
        assert_eq!(json["enteredRoom"], "kitchen");
        assert_eq!(json["usedSecretPassage"], false);
        assert_eq!(json["walked"][0]["col"], 20);
    }

    #[test]
    fn test_turn_phase_changed_room_is_null_outside_suggest() {
        let event = ServerEvent::TurnPhaseChanged {
            player_id: PlayerId(2),
            phase: TurnPhase::End,
            room: None,
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "turnPhaseChanged");
        assert_eq!(json["phase"], "end");
        assert!(json["room"].is_null());
    }

    #[test]
    fn test_suggestion_made_carries_refreshed_maps() {
        let mut pawns = HashMap::new();
        pawns.insert(
            Suspect::Plum,
            PawnPosition::InRoom { room: RoomId::Study },
        );
        let mut weapons = HashMap::new();
        weapons.insert(Weapon::Rope, RoomId::Study);

        let event = ServerEvent::SuggestionMade {
            player_id: PlayerId(1),
            player_name: "Ada".into(),
            suspect: Suspect::Plum,
            weapon: Weapon::Rope,
            room: RoomId::Study,
            pawns,
            weapons,
            summoned_player: Some(PlayerId(4)),
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "suggestionMade");
        assert_eq!(json["pawns"]["plum"], serde_json::json!({"room": "study"}));
        assert_eq!(json["weapons"]["rope"], "study");
        assert_eq!(json["summonedPlayer"], 4);
    }

    #[test]
    fn test_your_turn_to_disprove_json_format() {
        let event = ServerEvent::YourTurnToDisprove {
            suggestion: SuggestionRecap {
                suggester_id: PlayerId(1),
                suggester_name: "Ada".into(),
                suspect: Suspect::Plum,
                weapon: Weapon::Rope,
                room: RoomId::Study,
            },
            matching_cards: vec![Card::Suspect(Suspect::Plum)],
            can_disprove: true,
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "yourTurnToDisprove");
        assert_eq!(json["suggestion"]["suggesterName"], "Ada");
        assert_eq!(json["matchingCards"][0]["type"], "suspect");
        assert_eq!(json["canDisprove"], true);
    }

    #[test]
    fn test_card_shown_events_split_private_and_public() {
        let private = ServerEvent::CardShownToYou {
            shower_id: PlayerId(2),
            shower_name: "Bo".into(),
            card: Card::Weapon(Weapon::Rope),
        };
        let json = to_json(&private);
        assert_eq!(json["type"], "cardShownToYou");
        assert_eq!(json["card"]["id"], "rope");

        // The public counterpart must not name the card.
        let public = ServerEvent::CardShown {
            shower_id: PlayerId(2),
            shower_name: "Bo".into(),
            suggester_id: PlayerId(1),
            suggester_name: "Ada".into(),
        };
        let json = to_json(&public);
        assert_eq!(json["type"], "cardShown");
        assert!(json.get("card").is_none());
    }

    #[test]
    fn test_game_won_reveals_the_solution() {
        let event = ServerEvent::GameWon {
            winner_id: PlayerId(1),
            winner_name: "Ada".into(),
            solution: Solution {
                suspect: Suspect::Peacock,
                weapon: Weapon::Wrench,
                room: RoomId::Conservatory,
            },
            by_elimination: false,
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "gameWon");
        assert_eq!(json["solution"]["suspect"], "peacock");
        assert_eq!(json["byElimination"], false);
    }

    #[test]
    fn test_unit_events_are_bare_tags() {
        assert_eq!(
            to_json(&ServerEvent::PromptNewGame),
            serde_json::json!({"type": "promptNewGame"})
        );
        assert_eq!(
            to_json(&ServerEvent::GameEnded),
            serde_json::json!({"type": "gameEnded"})
        );
    }

    #[test]
    fn test_error_event_json_format() {
        let event = ServerEvent::Error {
            message: "It is not your turn.".into(),
        };
        let json = to_json(&event);
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "It is not your turn.");
    }

    #[test]
    fn test_server_event_round_trip() {
        let event = ServerEvent::TurnChanged {
            current_turn: PlayerId(9),
            current_turn_name: "Dee".into(),
            turn_phase: TurnPhase::Roll,
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
