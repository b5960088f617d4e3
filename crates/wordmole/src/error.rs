//! Unified error type for the Wordmole server.

use wordmole_protocol::ProtocolError;
use wordmole_room::RoomError;
use wordmole_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WordmoleError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (unavailable actor, refused action).
    #[error(transparent)]
    Room(#[from] RoomError),
}
