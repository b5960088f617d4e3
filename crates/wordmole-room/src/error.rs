//! Error types for the room layer.

use wordmole_protocol::PlayerId;

use crate::Phase;

/// Why a player action was refused.
///
/// Every variant is local to the offending action: the session rejects
/// without mutating any state, and the handler relays the message to the
/// sender alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The action is not valid in the room's current phase.
    #[error("{action} is not allowed during the {phase} phase")]
    PhaseViolation { action: &'static str, phase: Phase },

    /// A word was submitted by someone other than the current player.
    #[error("it is not player {0}'s turn")]
    OutOfTurn(PlayerId),

    /// The acting player is not (or no longer) a member of the room.
    #[error("player {0} is not in this room")]
    UnknownPlayer(PlayerId),

    /// A vote targeted an id that is not a member of the room.
    #[error("vote target {0} is not in this room")]
    UnknownTarget(PlayerId),

    /// `start` was called with too few players.
    #[error("at least {0} player(s) are needed to start")]
    NotEnoughPlayers(usize),
}

/// Errors surfaced by room handles and the registry.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The action reached the room but the session refused it.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The room's actor is gone (shut down or reclaimed); its command
    /// channel no longer accepts anything.
    #[error("room {0} is unavailable")]
    Unavailable(String),
}
