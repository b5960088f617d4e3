//! The per-room game session state machine.
//!
//! A [`GameSession`] owns everything one room knows: its players in join
//! order, the current [`Phase`], the round's secret word and imposter, the
//! [`TurnSequencer`] and [`VoteTally`]. Operations validate against the
//! current phase, mutate, and return `(Recipient, ServerMessage)` pairs for
//! the room actor to dispatch — the session itself never touches a channel
//! or socket, which keeps it directly unit-testable.
//!
//! The session is NOT thread-safe and doesn't need to be: exactly one room
//! actor task owns it, and every mutation arrives through that actor's
//! command queue.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};

use wordmole_protocol::{
    PlayerId, PlayerRef, Recipient, ServerMessage, TurnEntry,
};

use crate::words::MASKED_WORD;
use crate::{ActionError, Phase, RoomConfig, TurnSequencer, VoteTally};

/// A message addressed to some subset of the room.
pub type Outbound = (Recipient, ServerMessage);

/// One member of a room.
///
/// Players are created on join and, once a round has started, never removed:
/// a player who disconnects mid-game is marked inactive instead, so that the
/// imposter assignment and any ballots naming them stay valid.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_imposter: bool,
    pub active: bool,
}

/// One accepted word submission.
#[derive(Debug, Clone)]
struct Turn {
    player_id: PlayerId,
    word: String,
}

/// The state machine for a single room.
pub struct GameSession {
    code: String,
    config: RoomConfig,
    players: Vec<Player>,
    phase: Phase,
    secret_word: String,
    imposter: Option<PlayerId>,
    sequencer: TurnSequencer,
    turns: Vec<Turn>,
    tally: VoteTally,
    next_player_id: u64,
    rng: StdRng,
}

impl GameSession {
    /// Creates a fresh session in the lobby phase.
    ///
    /// `code` is the display form of the room code (shown verbatim to
    /// players; the registry handles normalized matching).
    pub fn new(code: impl Into<String>, config: RoomConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            code: code.into(),
            config,
            players: Vec::new(),
            phase: Phase::Lobby,
            secret_word: String::new(),
            imposter: None,
            sequencer: TurnSequencer::default(),
            turns: Vec::new(),
            tally: VoteTally::default(),
            next_player_id: 1,
            rng,
        }
    }

    // -- Accessors --------------------------------------------------------

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.active).count()
    }

    /// The imposter chosen at round start, if a round has started.
    pub fn imposter(&self) -> Option<PlayerId> {
        self.imposter
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    /// The fixed turn order of the current round.
    pub fn turn_order(&self) -> &[PlayerId] {
        self.sequencer.order()
    }

    /// The player whose turn it is, if the round is running.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.sequencer.current()
    }

    /// Words accepted so far this round.
    pub fn turns_taken(&self) -> usize {
        self.turns.len()
    }

    // -- Operations -------------------------------------------------------

    /// Adds a player to the lobby.
    ///
    /// Repeated joins with the same display name create distinct players.
    pub fn join(
        &mut self,
        name: &str,
    ) -> Result<(PlayerId, Vec<Outbound>), ActionError> {
        if !self.phase.accepts_joins() {
            return Err(ActionError::PhaseViolation {
                action: "join",
                phase: self.phase,
            });
        }

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player {
            id,
            name: name.to_string(),
            is_imposter: false,
            active: true,
        });

        tracing::info!(
            room = %self.code,
            %id,
            name,
            players = self.players.len(),
            "player joined"
        );

        Ok((id, vec![(Recipient::All, self.lobby_update())]))
    }

    /// Starts a round: picks the secret word, the turn order, and the
    /// imposter, and deals every player their individualized view.
    ///
    /// Outside the lobby this is a no-op (not an error) — a second `start`
    /// racing the first must not disturb a running round.
    pub fn start(&mut self) -> Result<Vec<Outbound>, ActionError> {
        if self.phase != Phase::Lobby {
            tracing::debug!(
                room = %self.code,
                phase = %self.phase,
                "start ignored outside lobby"
            );
            return Ok(Vec::new());
        }
        if self.players.len() < self.config.min_players {
            return Err(ActionError::NotEnoughPlayers(self.config.min_players));
        }

        self.secret_word = self
            .config
            .words
            .choose(&mut self.rng)
            .cloned()
            .expect("word list must not be empty");

        let mut order: Vec<PlayerId> =
            self.players.iter().map(|p| p.id).collect();
        order.shuffle(&mut self.rng);

        let imposter = *order
            .choose(&mut self.rng)
            .expect("player minimum was checked above");
        for player in &mut self.players {
            player.is_imposter = player.id == imposter;
        }
        self.imposter = Some(imposter);

        self.turns.clear();
        self.tally.clear();
        self.sequencer = TurnSequencer::new(order);
        self.transition(Phase::Turns);

        tracing::info!(
            room = %self.code,
            players = self.players.len(),
            "round started"
        );

        let order_names: Vec<String> = self
            .sequencer
            .order()
            .iter()
            .map(|id| self.display_name(*id))
            .collect();
        let roster: Vec<PlayerRef> = self
            .players
            .iter()
            .map(|p| PlayerRef { id: p.id, name: p.name.clone() })
            .collect();
        let current_turn = self
            .current_turn_name()
            .expect("a fresh round has a current player");

        Ok(self
            .players
            .iter()
            .map(|p| {
                let word = if p.is_imposter {
                    MASKED_WORD.to_string()
                } else {
                    self.secret_word.clone()
                };
                (
                    Recipient::Player(p.id),
                    ServerMessage::GameStart {
                        word,
                        your_id: p.id,
                        order: order_names.clone(),
                        roster: roster.clone(),
                        current_turn: current_turn.clone(),
                    },
                )
            })
            .collect())
    }

    /// Accepts a word from the player whose turn it is.
    ///
    /// Any other caller is rejected without mutating the turn list, the
    /// turn pointer, or the phase.
    pub fn submit_word(
        &mut self,
        player_id: PlayerId,
        word: String,
    ) -> Result<Vec<Outbound>, ActionError> {
        if self.phase != Phase::Turns {
            return Err(ActionError::PhaseViolation {
                action: "submitWord",
                phase: self.phase,
            });
        }
        if !self.is_member(player_id) {
            return Err(ActionError::UnknownPlayer(player_id));
        }
        if self.sequencer.current() != Some(player_id) {
            return Err(ActionError::OutOfTurn(player_id));
        }

        self.turns.push(Turn { player_id, word });
        let active = self.active_ids();
        self.sequencer.advance(|id| active.contains(&id));

        if self.sequencer.is_complete() {
            self.transition(Phase::Decision);
            tracing::info!(room = %self.code, "all turns taken, voting open");
            Ok(vec![(Recipient::All, self.voting_open_update())])
        } else {
            Ok(vec![(
                Recipient::All,
                ServerMessage::TurnUpdate {
                    turns: self.turn_entries(),
                    current_turn: self.current_turn_name(),
                    allow_voting: None,
                },
            )])
        }
    }

    /// Records `voter`'s ballot for `target`. Re-votes overwrite.
    ///
    /// Once every active player has voted, the suspect is resolved, the
    /// outcome is broadcast, and the session moves to its terminal phase —
    /// resolution can fire only once per round.
    pub fn vote(
        &mut self,
        voter: PlayerId,
        target: PlayerId,
    ) -> Result<Vec<Outbound>, ActionError> {
        if self.phase != Phase::Decision {
            return Err(ActionError::PhaseViolation {
                action: "vote",
                phase: self.phase,
            });
        }
        if !self.players.iter().any(|p| p.id == voter && p.active) {
            return Err(ActionError::UnknownPlayer(voter));
        }
        if !self.is_member(target) {
            return Err(ActionError::UnknownTarget(target));
        }

        self.tally.cast(voter, target);
        tracing::debug!(
            room = %self.code,
            %voter,
            %target,
            voters = self.tally.voter_count(),
            "ballot recorded"
        );

        if self.tally.is_complete(self.active_player_count()) {
            Ok(self.resolve_votes())
        } else {
            Ok(Vec::new())
        }
    }

    /// Restarts turn-taking with the same players, secret word, and
    /// imposter, instead of finishing the vote.
    pub fn next_round(&mut self) -> Result<Vec<Outbound>, ActionError> {
        if self.phase != Phase::Decision {
            return Err(ActionError::PhaseViolation {
                action: "nextRound",
                phase: self.phase,
            });
        }

        self.turns.clear();
        // Stale ballots must not leak into the next decision, or it could
        // resolve the moment it opens.
        self.tally.clear();
        let active = self.active_ids();
        self.sequencer.reset(|id| active.contains(&id));
        self.transition(Phase::Turns);

        tracing::info!(room = %self.code, "next round started");

        if self.sequencer.is_complete() {
            // Everyone in the order has dropped; the fresh round is already
            // over and the vote reopens immediately.
            self.transition(Phase::Decision);
            return Ok(vec![(Recipient::All, self.voting_open_update())]);
        }

        Ok(vec![(
            Recipient::All,
            ServerMessage::TurnUpdate {
                turns: Vec::new(),
                current_turn: self.current_turn_name(),
                allow_voting: None,
            },
        )])
    }

    /// Handles a player's disconnection, delivered through the same room
    /// actor queue as every game action.
    ///
    /// In the lobby the player is removed outright. After round start they
    /// are kept but marked inactive: the sequencer skips them and they no
    /// longer count toward vote completion — which means a disconnect can
    /// itself complete the current turn round or the vote.
    pub fn player_left(&mut self, player_id: PlayerId) -> Vec<Outbound> {
        match self.phase {
            Phase::Lobby => {
                let before = self.players.len();
                self.players.retain(|p| p.id != player_id);
                if self.players.len() == before {
                    return Vec::new();
                }
                tracing::info!(
                    room = %self.code,
                    %player_id,
                    players = self.players.len(),
                    "player left lobby"
                );
                vec![(Recipient::All, self.lobby_update())]
            }
            Phase::Turns => {
                if !self.deactivate(player_id) {
                    return Vec::new();
                }
                if self.sequencer.current() != Some(player_id) {
                    return Vec::new();
                }
                // It was their turn: skip ahead without consuming a turn.
                let active = self.active_ids();
                self.sequencer.skip_ineligible(|id| active.contains(&id));
                if self.sequencer.is_complete() {
                    self.transition(Phase::Decision);
                    vec![(Recipient::All, self.voting_open_update())]
                } else {
                    vec![(
                        Recipient::All,
                        ServerMessage::TurnUpdate {
                            turns: self.turn_entries(),
                            current_turn: self.current_turn_name(),
                            allow_voting: None,
                        },
                    )]
                }
            }
            Phase::Decision => {
                if !self.deactivate(player_id) {
                    return Vec::new();
                }
                self.tally.retract(player_id);
                if self.tally.is_complete(self.active_player_count()) {
                    self.resolve_votes()
                } else {
                    Vec::new()
                }
            }
            Phase::Done => Vec::new(),
        }
    }

    // -- Internals --------------------------------------------------------

    fn transition(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::debug!(
            room = %self.code,
            from = %self.phase,
            to = %next,
            "phase transition"
        );
        self.phase = next;
    }

    fn resolve_votes(&mut self) -> Vec<Outbound> {
        let join_order: Vec<PlayerId> =
            self.players.iter().map(|p| p.id).collect();
        let suspect = self
            .tally
            .resolve(&join_order)
            .expect("completion implies at least one ballot");
        let imposter = self
            .imposter
            .expect("imposter is assigned when the round starts");
        let caught = suspect == imposter;

        self.transition(Phase::Done);
        tracing::info!(
            room = %self.code,
            %suspect,
            %imposter,
            caught,
            "vote resolved"
        );

        vec![(
            Recipient::All,
            ServerMessage::GameOver {
                imposter: caught,
                real_imposter: self.display_name(imposter),
            },
        )]
    }

    fn is_member(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    fn deactivate(&mut self, id: PlayerId) -> bool {
        match self.players.iter_mut().find(|p| p.id == id && p.active) {
            Some(player) => {
                player.active = false;
                tracing::info!(
                    room = %self.code,
                    player_id = %id,
                    "player marked inactive"
                );
                true
            }
            None => false,
        }
    }

    fn active_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.active)
            .map(|p| p.id)
            .collect()
    }

    fn name_of(&self, id: PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }

    fn display_name(&self, id: PlayerId) -> String {
        self.name_of(id).unwrap_or("?").to_string()
    }

    fn current_turn_name(&self) -> Option<String> {
        self.sequencer.current().map(|id| self.display_name(id))
    }

    fn lobby_update(&self) -> ServerMessage {
        ServerMessage::LobbyUpdate {
            players: self.players.iter().map(|p| p.name.clone()).collect(),
        }
    }

    fn voting_open_update(&self) -> ServerMessage {
        ServerMessage::TurnUpdate {
            turns: self.turn_entries(),
            current_turn: None,
            allow_voting: Some(true),
        }
    }

    fn turn_entries(&self) -> Vec<TurnEntry> {
        self.turns
            .iter()
            .map(|t| TurnEntry {
                name: self.display_name(t.player_id),
                word: t.word.clone(),
            })
            .collect()
    }
}

// =========================================================================
// Tests
// =========================================================================
