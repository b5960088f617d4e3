//! Wire protocol for Wordmole.
//!
//! This crate defines the messages that travel between a game client and the
//! server, and how they are converted to and from bytes:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`PlayerId`], etc.) —
//!   the structures that go on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — serialization strategy.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding or
//!   decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the room layer
//! (game state). It knows nothing about connections or rooms — it only knows
//! message shapes. Every frame is a single JSON object carrying a `"type"`
//! discriminator.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, PlayerId, PlayerRef, Recipient, ServerMessage, TurnEntry,
};
