//! # Wordmole
//!
//! A WebSocket server for the imposter word game: players join a coded room,
//! everyone except one secret "mole" is shown the same word, players take
//! turns hinting at it with one word each, and the room votes on who was
//! bluffing.
//!
//! The layering runs transport → protocol → room → server: this crate binds
//! them together with one task per connection feeding per-room actors.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wordmole::WordmoleServerBuilder;
//!
//! # async fn run() -> Result<(), wordmole::WordmoleError> {
//! let server = WordmoleServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::WordmoleError;
pub use server::{WordmoleServer, WordmoleServerBuilder};
