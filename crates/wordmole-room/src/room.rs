//! Room actor: an isolated Tokio task that owns one game session.
//!
//! Each room runs in its own task, communicating with connection handlers
//! through an mpsc channel. This is the serialization point for everything
//! that touches room state: two players acting "simultaneously" are observed
//! as a strict sequence of commands, so there is no interleaved
//! read-modify-write anywhere in the game logic. Rooms never share locks;
//! operations on different rooms proceed fully independently.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, oneshot};

use wordmole_protocol::{PlayerId, Recipient, ServerMessage};

use crate::{ActionError, GameSession, Outbound, Phase, RoomConfig, RoomError};

/// Channel sender for delivering outbound messages to one player.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// A game action taken by a bound player.
#[derive(Debug, Clone)]
pub enum PlayerAction {
    /// Start the round (lobby only).
    Start,
    /// Submit a word for `player_id`'s turn. The id is the one claimed on
    /// the wire; the session validates it against the current turn.
    SubmitWord { player_id: PlayerId, word: String },
    /// Vote for `target_id`; the voter is the acting player.
    Vote { target_id: PlayerId },
    /// Restart turn-taking with the same secret.
    NextRound,
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Add a player to the room.
    Join {
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<PlayerId, RoomError>>,
    },

    /// Apply a game action on behalf of a player. The reply carries the
    /// rejection, if any, so the handler can inform the sender alone.
    Action {
        player_id: PlayerId,
        action: PlayerAction,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// The player's connection went away.
    Disconnect { player_id: PlayerId },

    /// Request a metadata snapshot (used by the registry sweep).
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the room.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's display code.
    pub code: String,
    /// Current phase.
    pub phase: Phase,
    /// Players still connected.
    pub active_players: usize,
    /// All players ever joined (including inactive ones mid-game).
    pub total_players: usize,
    /// Time since the last player-originated command.
    pub idle_for: Duration,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    code: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's display code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns `true` if the actor behind this handle is gone.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Adds a player; returns their freshly assigned id.
    pub async fn join(
        &self,
        name: impl Into<String>,
        sender: PlayerSender,
    ) -> Result<PlayerId, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                name: name.into(),
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Applies a game action for `player_id`, waiting for acceptance or the
    /// rejection to relay back to the sender.
    pub async fn action(
        &self,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Action {
                player_id,
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Reports a disconnect (fire-and-forget).
    pub async fn disconnect(
        &self,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor. Runs inside a Tokio task.
struct RoomActor {
    session: GameSession,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
    last_activity: Instant,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(room = %self.session.code(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { name, sender, reply } => {
                    self.last_activity = Instant::now();
                    let result = match self.session.join(&name) {
                        Ok((player_id, msgs)) => {
                            self.senders.insert(player_id, sender);
                            self.dispatch(msgs);
                            Ok(player_id)
                        }
                        Err(e) => Err(e.into()),
                    };
                    let _ = reply.send(result);
                }
                RoomCommand::Action { player_id, action, reply } => {
                    self.last_activity = Instant::now();
                    match self.apply(player_id, action) {
                        Ok(msgs) => {
                            self.dispatch(msgs);
                            let _ = reply.send(Ok(()));
                        }
                        Err(e) => {
                            let _ = reply.send(Err(e.into()));
                        }
                    }
                }
                RoomCommand::Disconnect { player_id } => {
                    self.last_activity = Instant::now();
                    self.senders.remove(&player_id);
                    let msgs = self.session.player_left(player_id);
                    self.dispatch(msgs);
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(
                        room = %self.session.code(),
                        "room shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!(room = %self.session.code(), "room actor stopped");
    }

    fn apply(
        &mut self,
        player_id: PlayerId,
        action: PlayerAction,
    ) -> Result<Vec<Outbound>, ActionError> {
        match action {
            PlayerAction::Start => self.session.start(),
            PlayerAction::SubmitWord { player_id, word } => {
                self.session.submit_word(player_id, word)
            }
            PlayerAction::Vote { target_id } => {
                self.session.vote(player_id, target_id)
            }
            PlayerAction::NextRound => self.session.next_round(),
        }
    }

    /// Fans messages out to their recipients. A dead channel for one player
    /// never blocks delivery to the others and never fails the operation
    /// that produced the message.
    fn dispatch(&self, msgs: Vec<Outbound>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for pid in self.senders.keys() {
                        self.send_to(*pid, msg.clone());
                    }
                }
                Recipient::Player(pid) => {
                    self.send_to(pid, msg);
                }
                Recipient::AllExcept(excluded) => {
                    for pid in self.senders.keys() {
                        if *pid != excluded {
                            self.send_to(*pid, msg.clone());
                        }
                    }
                }
            }
        }
    }

    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            if sender.send(msg).is_err() {
                tracing::debug!(
                    room = %self.session.code(),
                    %player_id,
                    "dropping message for unreachable player"
                );
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.session.code().to_string(),
            phase: self.session.phase(),
            active_players: self.session.active_player_count(),
            total_players: self.session.player_count(),
            idle_for: self.last_activity.elapsed(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `channel_size` bounds the command queue — senders wait when it fills.
pub(crate) fn spawn_room(
    code: String,
    config: RoomConfig,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        session: GameSession::new(code.clone(), config),
        senders: HashMap::new(),
        receiver: rx,
        last_activity: Instant::now(),
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
