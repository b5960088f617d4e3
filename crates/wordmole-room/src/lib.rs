//! Room lifecycle and game logic for Wordmole.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its own
//! [`GameSession`]. Every mutation of a room — joins, word submissions,
//! votes, disconnects — flows through that actor's command channel, so
//! concurrent player actions are observed as a strict sequence. Rooms never
//! share state with each other; the [`RoomRegistry`] is the only cross-room
//! structure.
//!
//! # Key types
//!
//! - [`GameSession`] — the per-room state machine (lobby, turns, vote)
//! - [`RoomRegistry`] — creates and reclaims rooms, keyed by room code
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`Phase`] — the room lifecycle state machine
//! - [`TurnSequencer`] / [`VoteTally`] — pure turn-order and ballot logic
//! - [`RoomConfig`] — room settings (player minimum, idle timeouts, words)

mod config;
mod error;
mod registry;
mod room;
mod session;
mod turn;
mod vote;
pub mod words;

pub use config::{Phase, RoomConfig};
pub use error::{ActionError, RoomError};
pub use registry::RoomRegistry;
pub use room::{PlayerAction, PlayerSender, RoomHandle, RoomInfo};
pub use session::{GameSession, Outbound, Player};
pub use turn::TurnSequencer;
pub use vote::VoteTally;
