//! Room configuration and phase state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::words;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Minimum players required for `start` to be accepted.
    pub min_players: usize,

    /// A room untouched for this long is reclaimed by the sweeper,
    /// whatever phase it is in.
    pub idle_timeout: Duration,

    /// How long a room with no connected players survives before the
    /// sweeper reclaims it. Nonzero so that a freshly created room isn't
    /// torn down between creation and its first join.
    pub empty_room_grace: Duration,

    /// The words a round's secret is drawn from. Must not be empty.
    pub words: Vec<String>,

    /// Fixed seed for the room's random source. `None` seeds from the OS.
    /// Tests set this to make word, imposter, and turn-order selection
    /// deterministic.
    pub rng_seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 1,
            idle_timeout: Duration::from_secs(300),
            empty_room_grace: Duration::from_secs(5),
            words: words::WORDS.iter().map(|w| (*w).to_string()).collect(),
            rng_seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// Transitions are monotone — no skipping, no reversing — with one explicit
/// loop edge for playing another round with the same secret:
///
/// ```text
/// Lobby → Turns → Decision → Done
///           ↑________|
///          (next round)
/// ```
///
/// - **Lobby**: players are joining. The only phase that accepts joins.
/// - **Turns**: the round is running; players submit one word each in
///   turn order.
/// - **Decision**: every player has spoken; votes are being collected.
/// - **Done**: the vote resolved. Terminal — a finished room is discarded,
///   never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Turns,
    Decision,
    Done,
}

impl Phase {
    /// Returns `true` if the room is accepting new players.
    pub fn accepts_joins(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if the phase is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Lobby, Self::Turns)
                | (Self::Turns, Self::Decision)
                | (Self::Decision, Self::Done)
                | (Self::Decision, Self::Turns)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Turns => write!(f, "turns"),
            Self::Decision => write!(f, "decision"),
            Self::Done => write!(f, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_forward_transitions_are_valid() {
        assert!(Phase::Lobby.can_transition_to(Phase::Turns));
        assert!(Phase::Turns.can_transition_to(Phase::Decision));
        assert!(Phase::Decision.can_transition_to(Phase::Done));
    }

    #[test]
    fn test_phase_next_round_edge_is_valid() {
        assert!(Phase::Decision.can_transition_to(Phase::Turns));
    }

    #[test]
    fn test_phase_skipping_and_reversing_are_invalid() {
        assert!(!Phase::Lobby.can_transition_to(Phase::Decision));
        assert!(!Phase::Lobby.can_transition_to(Phase::Done));
        assert!(!Phase::Turns.can_transition_to(Phase::Done));
        assert!(!Phase::Turns.can_transition_to(Phase::Lobby));
        assert!(!Phase::Done.can_transition_to(Phase::Lobby));
        assert!(!Phase::Done.can_transition_to(Phase::Turns));
    }

    #[test]
    fn test_phase_accepts_joins_only_in_lobby() {
        assert!(Phase::Lobby.accepts_joins());
        assert!(!Phase::Turns.accepts_joins());
        assert!(!Phase::Decision.accepts_joins());
        assert!(!Phase::Done.accepts_joins());
    }

    #[test]
    fn test_phase_done_is_terminal() {
        assert!(Phase::Done.is_terminal());
        assert!(!Phase::Decision.is_terminal());
        assert!(!Phase::Done.can_transition_to(Phase::Done));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Lobby.to_string(), "lobby");
        assert_eq!(Phase::Decision.to_string(), "decision");
    }

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.min_players, 1);
        assert!(!config.words.is_empty());
        assert!(config.rng_seed.is_none());
    }
}
