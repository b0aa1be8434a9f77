//! Room session lifecycle: lobby, live game, finish, rematch.
//!
//! A [`Session`] is everything one room knows, minus the networking. It
//! admits players while in the lobby, hands gameplay commands to the
//! inner [`Game`], and runs the end-of-game ceremony (win modal
//! acknowledgements, the host's rematch decision). The room task owns
//! exactly one `Session` and calls it from a single place, so nothing
//! here is locked or shared.
//!
//! The host is not stored anywhere: it is always the first player in
//! the roster, which makes host transfer on disconnect automatic.

use std::collections::HashSet;

use rand::Rng;

use sleuth_protocol::{
    ClientCommand, PlayerId, PlayerSummary, Recipient, RoomCode, ServerEvent,
};

use crate::error::Rejection;
use crate::game::Game;

/// The table seats at most six players, one per suspect.
pub const MAX_PLAYERS: usize = 6;
/// Below three players deduction collapses; the deal needs opponents.
pub const MIN_PLAYERS: usize = 3;

/// A person in the room, whether or not a game is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// Which stage of its life the room is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Players are gathering; the host may start at three or more.
    Lobby,
    /// A game is running.
    Playing,
    /// Somebody won; waiting on modal closes and the host's call.
    Finished,
}

/// One room's complete state.
#[derive(Debug)]
pub struct Session {
    code: RoomCode,
    players: Vec<Player>,
    phase: SessionPhase,
    game: Option<Game>,
    /// Who has dismissed the end-of-game screen.
    closed_modal: HashSet<PlayerId>,
    /// The rematch prompt is sent to the host at most once per game.
    prompted_new_game: bool,
    /// Set when the room is done for good (roster emptied out, or the
    /// host declined a rematch). The room task shuts down on it.
    closed: bool,
}

impl Session {
    pub fn new(code: RoomCode) -> Self {
        Session {
            code,
            players: Vec::new(),
            phase: SessionPhase::Lobby,
            game: None,
            closed_modal: HashSet::new(),
            prompted_new_game: false,
            closed: false,
        }
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub fn code(&self) -> RoomCode {
        self.code
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The first player in the roster hosts.
    pub fn host(&self) -> Option<PlayerId> {
        self.players.first().map(|p| p.id)
    }

    /// The running (or just-finished) game, for state queries.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// Whether the room is done for good and its task should stop.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // -----------------------------------------------------------------------
    // Joining
    // -----------------------------------------------------------------------

    /// Seats a new player. The first to join hosts.
    ///
    /// Names are trimmed and must be non-empty. Produces a private
    /// `Joined` acknowledgement followed by the roster broadcast.
    pub fn join(
        &mut self,
        id: PlayerId,
        name: String,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        if self.phase != SessionPhase::Lobby {
            return Err(Rejection::GameInProgress);
        }
        if self.players.iter().any(|p| p.id == id) {
            return Err(Rejection::AlreadyJoined);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(Rejection::RoomFull);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::NameRequired);
        }
        let lowered = name.to_lowercase();
        if self.players.iter().any(|p| p.name.to_lowercase() == lowered) {
            return Err(Rejection::NameTaken);
        }

        self.players.push(Player { id, name: name.to_string() });

        let mut events = vec![(
            Recipient::Player(id),
            ServerEvent::Joined { player_id: id, room_code: self.code },
        )];
        if let Some(update) = self.room_update() {
            events.push((Recipient::All, update));
        }
        Ok(events)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Routes one command from a seated player.
    ///
    /// Gameplay commands go to the inner game; lifecycle commands are
    /// handled here. Every path either returns the events to fan out or
    /// a [`Rejection`] for the sender alone.
    pub fn handle_command(
        &mut self,
        sender: PlayerId,
        command: ClientCommand,
        rng: &mut impl Rng,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        let events = match command {
            ClientCommand::Join { .. } => return Err(Rejection::AlreadyJoined),
            ClientCommand::StartGame => self.start_game(sender, rng)?,
            ClientCommand::RollDice => self.game_mut()?.roll_dice(sender, rng)?,
            ClientCommand::MovePawn { target } => self.game_mut()?.move_pawn(sender, target)?,
            ClientCommand::UseSecretPassage => self.game_mut()?.use_secret_passage(sender)?,
            ClientCommand::StayPut => self.game_mut()?.stay_put(sender)?,
            ClientCommand::MakeSuggestion { suspect, weapon } => {
                self.game_mut()?.make_suggestion(sender, suspect, weapon)?
            }
            ClientCommand::ShowCard { card } => self.game_mut()?.show_card(sender, card)?,
            ClientCommand::CannotDisprove => self.game_mut()?.cannot_disprove(sender)?,
            ClientCommand::MakeAccusation { suspect, weapon, room } => {
                self.game_mut()?.make_accusation(sender, suspect, weapon, room)?
            }
            ClientCommand::EndTurn => self.game_mut()?.end_turn(sender)?,
            ClientCommand::CloseWinModal => self.close_win_modal(sender),
            ClientCommand::StartNewGame => self.start_new_game(sender)?,
            ClientCommand::DeclineNewGame => self.decline_new_game(sender)?,
        };
        self.check_finished();
        Ok(events)
    }

    /// Removes a departed player everywhere they are referenced.
    ///
    /// Infallible: a disconnect is a fact, not a request. The game (if
    /// running) unwedges its turn and disproof state first, then the
    /// departure and any host transfer are announced.
    pub fn handle_disconnect(&mut self, id: PlayerId) -> Vec<(Recipient, ServerEvent)> {
        let Some(index) = self.players.iter().position(|p| p.id == id) else {
            return Vec::new();
        };
        let was_host = index == 0;
        let departed = self.players.remove(index);
        self.closed_modal.remove(&id);

        let mut events = Vec::new();
        if self.phase == SessionPhase::Playing {
            if let Some(game) = self.game.as_mut() {
                events.extend(game.remove_player(id));
            }
            self.check_finished();
        }

        if self.players.is_empty() {
            self.closed = true;
            return events;
        }

        let new_host_id = if was_host { self.host() } else { None };
        events.push((
            Recipient::All,
            ServerEvent::PlayerDisconnected {
                player_id: id,
                player_name: departed.name,
                new_host_id,
            },
        ));
        if let Some(update) = self.room_update() {
            events.push((Recipient::All, update));
        }

        // If the departure was the last outstanding modal, the host can
        // now be offered the rematch.
        events.extend(self.maybe_prompt_new_game());

        events
    }

    // -----------------------------------------------------------------------
    // Lifecycle commands
    // -----------------------------------------------------------------------

    fn start_game(
        &mut self,
        sender: PlayerId,
        rng: &mut impl Rng,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        if self.host() != Some(sender) {
            return Err(Rejection::NotHost);
        }
        if self.phase != SessionPhase::Lobby {
            return Err(Rejection::GameInProgress);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(Rejection::NeedMorePlayers);
        }

        let (game, events) = Game::start(&self.players, rng);
        self.game = Some(game);
        self.phase = SessionPhase::Playing;
        self.closed_modal.clear();
        self.prompted_new_game = false;
        Ok(events)
    }

    /// Records an end-screen dismissal. A stale acknowledgement (no
    /// finished game) is dropped rather than rejected.
    fn close_win_modal(&mut self, sender: PlayerId) -> Vec<(Recipient, ServerEvent)> {
        if self.phase != SessionPhase::Finished {
            return Vec::new();
        }
        self.closed_modal.insert(sender);
        self.maybe_prompt_new_game()
    }

    fn start_new_game(
        &mut self,
        sender: PlayerId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        if self.host() != Some(sender) {
            return Err(Rejection::NewGameHostOnly);
        }
        match self.phase {
            SessionPhase::Finished => {}
            SessionPhase::Lobby => return Err(Rejection::NoGameRunning),
            SessionPhase::Playing => return Err(Rejection::GameStillRunning),
        }

        self.game = None;
        self.phase = SessionPhase::Lobby;
        self.closed_modal.clear();
        self.prompted_new_game = false;

        let players = self.roster();
        let host_id = self.host().ok_or(Rejection::NotSeated)?;
        Ok(vec![(
            Recipient::All,
            ServerEvent::ReturnToLobby { players, host_id, room_code: self.code },
        )])
    }

    fn decline_new_game(
        &mut self,
        sender: PlayerId,
    ) -> Result<Vec<(Recipient, ServerEvent)>, Rejection> {
        if self.host() != Some(sender) {
            return Err(Rejection::NewGameHostOnly);
        }
        match self.phase {
            SessionPhase::Finished => {}
            SessionPhase::Lobby => return Err(Rejection::NoGameRunning),
            SessionPhase::Playing => return Err(Rejection::GameStillRunning),
        }

        self.closed = true;
        Ok(vec![(Recipient::All, ServerEvent::GameEnded)])
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// The running game, or the rejection matching the current stage.
    fn game_mut(&mut self) -> Result<&mut Game, Rejection> {
        match self.phase {
            SessionPhase::Playing => {}
            SessionPhase::Lobby => return Err(Rejection::NoGameRunning),
            SessionPhase::Finished => return Err(Rejection::GameOver),
        }
        self.game.as_mut().ok_or(Rejection::NoGameRunning)
    }

    fn check_finished(&mut self) {
        if self.phase == SessionPhase::Playing
            && self.game.as_ref().is_some_and(|g| g.winner().is_some())
        {
            self.phase = SessionPhase::Finished;
        }
    }

    /// Offers the host a rematch once every seated player has dismissed
    /// the end screen. Fires at most once per finished game.
    fn maybe_prompt_new_game(&mut self) -> Vec<(Recipient, ServerEvent)> {
        if self.phase != SessionPhase::Finished || self.prompted_new_game {
            return Vec::new();
        }
        let all_closed = self
            .players
            .iter()
            .all(|p| self.closed_modal.contains(&p.id));
        if !all_closed {
            return Vec::new();
        }
        let Some(host) = self.host() else {
            return Vec::new();
        };
        self.prompted_new_game = true;
        vec![(Recipient::Player(host), ServerEvent::PromptNewGame)]
    }

    fn roster(&self) -> Vec<PlayerSummary> {
        self.players
            .iter()
            .map(|p| PlayerSummary { id: p.id, name: p.name.clone() })
            .collect()
    }

    fn room_update(&self) -> Option<ServerEvent> {
        let host_id = self.host()?;
        Some(ServerEvent::RoomUpdate {
            players: self.roster(),
            host_id,
            room_code: self.code,
        })
    }
}

// =========================================================================
// Tests
// =========================================================================
