//! Rule rejections.
//!
//! Every way a client command can be refused lives in one enum. The
//! `Display` text is what players actually see, so the messages are
//! written for humans at the table, not for operators reading logs.

use sleuth_board::MoveError;

/// A command was understood but is not allowed right now.
///
/// Rejections are answers to a single player, never broadcast. The room
/// layer wraps the message in an error event and sends it back to the
/// sender alone; the rest of the table never learns a rule was tripped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    // --- Joining and lobby admission --------------------------------------

    /// A second join from a connection that already holds a seat.
    #[error("You have already joined this room.")]
    AlreadyJoined,

    /// Joining a room whose game is underway, or starting one twice.
    #[error("Game has already started.")]
    GameInProgress,

    /// The table seats at most six detectives.
    #[error("Room is full (max 6 players).")]
    RoomFull,

    /// An empty or whitespace-only display name.
    #[error("Please enter your name.")]
    NameRequired,

    /// Another player in the room already uses this name
    /// (compared case-insensitively).
    #[error("That name is already taken in this room.")]
    NameTaken,

    // --- Starting and restarting ------------------------------------------

    /// Only the host may launch the game.
    #[error("Only the host can start the game.")]
    NotHost,

    /// Only the host answers the new-game prompt.
    #[error("Only the host can decide on a new game.")]
    NewGameHostOnly,

    /// Fewer than three players seated.
    #[error("Need at least 3 players to start.")]
    NeedMorePlayers,

    /// A gameplay command arrived while the room is still in the lobby.
    #[error("The game has not started.")]
    NoGameRunning,

    /// A gameplay command arrived after the game finished.
    #[error("The game is over.")]
    GameOver,

    /// A new-game decision arrived before anyone won.
    #[error("The game is still in progress.")]
    GameStillRunning,

    // --- Turn ownership and phase -----------------------------------------

    /// The sender is seated but it is another player's turn.
    #[error("It is not your turn.")]
    NotYourTurn,

    /// The sender holds no seat in the running game.
    #[error("You are not in this game.")]
    NotSeated,

    #[error("You cannot roll right now.")]
    CannotRollNow,

    #[error("You cannot move right now.")]
    CannotMoveNow,

    #[error("You cannot use the secret passage right now.")]
    CannotUsePassageNow,

    #[error("You cannot stay put right now.")]
    CannotStayPutNow,

    #[error("You cannot make a suggestion right now.")]
    CannotSuggestNow,

    /// Ending the turn while a suggestion is still owed.
    #[error("You must make a suggestion first.")]
    SuggestFirst,

    // --- Movement ----------------------------------------------------------

    /// The board rejected the requested movement.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Suggesting from the room you are already in, twice in a row,
    /// is blocked by forbidding the move that stays in the same room.
    #[error("You cannot re-enter the same room on the same turn.")]
    SameRoom,

    /// Secret passages and suggestions require standing in a room.
    #[error("You are not in a room.")]
    NotInRoom,

    #[error("You must be in a room to stay put.")]
    StayPutNeedsRoom,

    #[error("You must be in a room to make a suggestion.")]
    SuggestNeedsRoom,

    /// The sender's room has no secret passage.
    #[error("This room has no secret passage.")]
    NoPassage,

    /// Staying put is a privilege earned by being summoned.
    #[error("You can only stay put after being summoned by a suggestion.")]
    NotSummoned,

    // --- Disproof ----------------------------------------------------------

    /// No suggestion is waiting to be disproved.
    #[error("There is no suggestion to disprove.")]
    NoPendingSuggestion,

    /// The disproof cursor points at someone else.
    #[error("It is not your turn to disprove.")]
    NotYourDisprove,

    /// The shown card is not in the sender's hand.
    #[error("You do not have that card.")]
    CardNotHeld,

    /// The shown card names none of the three suggested cards.
    #[error("That card does not match the suggestion.")]
    CardNotMatching,

    /// Holding a matching card forbids passing.
    #[error("You have a matching card and must show it.")]
    MustShowCard,

    // --- Accusations --------------------------------------------------------

    /// Accusing while a suggestion is still being disproved.
    #[error("Wait for the suggestion to be resolved.")]
    DisproofPending,

    /// One false accusation eliminates a player for the rest of the game.
    #[error("You have already made a false accusation.")]
    AlreadyAccused,
}
