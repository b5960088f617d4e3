//! Per-connection handler: message decoding, room binding, and routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Decode each inbound frame into a typed [`ClientMessage`] at the
//!      boundary — malformed frames are logged and dropped, the connection
//!      stays open, and nothing malformed ever reaches game logic.
//!   2. The first successful `join` binds the connection to exactly one
//!      `(player, room)` pair and starts a writer task pumping the room's
//!      outbound messages to the socket.
//!   3. All other actions are routed to the bound room; rejections go back
//!      to this sender alone.
//!   4. When the socket closes (however it closes), the room is told the
//!      player is gone — through the same command queue as game actions, so
//!      a disconnect cannot race an in-flight vote or submission.

use std::sync::Arc;

use tokio::sync::mpsc;

use wordmole_protocol::{ClientMessage, Codec, JsonCodec, PlayerId, ServerMessage};
use wordmole_room::{PlayerAction, RoomHandle};
use wordmole_transport::{Connection, WebSocketConnection};

use crate::WordmoleError;
use crate::server::ServerState;

/// The (player, room) pair a connection is bound to after joining.
struct Binding {
    player_id: PlayerId,
    room: RoomHandle,
}

/// Drop guard that reports the bound player's departure when the handler
/// exits — on clean close, transport error, or panic alike. `Drop` is
/// synchronous, so the actual notification runs in a spawned task.
struct BindingGuard {
    binding: Option<Binding>,
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        if let Some(bound) = self.binding.take() {
            tokio::spawn(async move {
                let _ = bound.room.disconnect(bound.player_id).await;
            });
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), WordmoleError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let mut guard = BindingGuard { binding: None };

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(
                    %conn_id,
                    error = %e,
                    "dropping malformed message"
                );
                continue;
            }
        };

        match msg {
            ClientMessage::Join { name, room } => {
                handle_join(&conn, &state, &mut guard, name, room).await?;
            }
            ClientMessage::Start => {
                route(&conn, &state, &guard, PlayerAction::Start).await?;
            }
            ClientMessage::SubmitWord { player_id, word } => {
                route(
                    &conn,
                    &state,
                    &guard,
                    PlayerAction::SubmitWord { player_id, word },
                )
                .await?;
            }
            ClientMessage::Vote { target_id } => {
                route(&conn, &state, &guard, PlayerAction::Vote { target_id })
                    .await?;
            }
            ClientMessage::NextRound => {
                route(&conn, &state, &guard, PlayerAction::NextRound).await?;
            }
        }
    }

    // guard drops here → the room hears about the departure.
    Ok(())
}

/// Binds the connection to a room, creating the room on first join.
async fn handle_join(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    guard: &mut BindingGuard,
    name: String,
    room: String,
) -> Result<(), WordmoleError> {
    if guard.binding.is_some() {
        return send_rejection(conn, state, "already in a room").await;
    }

    let handle = state.registry.get_or_create(&room).await;
    let (tx, rx) = mpsc::unbounded_channel();

    match handle.join(name, tx).await {
        Ok(player_id) => {
            spawn_writer(conn.clone(), rx, state.codec);
            tracing::info!(
                conn_id = %conn.id(),
                %player_id,
                room = %handle.code(),
                "connection bound"
            );
            guard.binding = Some(Binding { player_id, room: handle });
            Ok(())
        }
        Err(e) => send_rejection(conn, state, &e.to_string()).await,
    }
}

/// Routes a game action to the bound room; relays any rejection back to the
/// sender only.
async fn route(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    guard: &BindingGuard,
    action: PlayerAction,
) -> Result<(), WordmoleError> {
    let Some(bound) = guard.binding.as_ref() else {
        return send_rejection(conn, state, "join a room first").await;
    };

    if let Err(e) = bound.room.action(bound.player_id, action).await {
        return send_rejection(conn, state, &e.to_string()).await;
    }
    Ok(())
}

/// Sends a `rejected` message to this connection alone.
async fn send_rejection(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    reason: &str,
) -> Result<(), WordmoleError> {
    let msg = ServerMessage::Rejected { reason: reason.to_string() };
    let bytes = state.codec.encode(&msg)?;
    conn.send(&bytes).await.map_err(WordmoleError::Transport)
}

/// Starts the task that pumps a player's room messages out on the socket.
///
/// The task ends when the room drops the player's channel (departure or
/// room teardown) or when the socket stops accepting writes.
fn spawn_writer(
    conn: WebSocketConnection,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    codec: JsonCodec,
) {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let bytes = match codec.encode(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "failed to encode outbound message"
                    );
                    continue;
                }
            };
            if conn.send(&bytes).await.is_err() {
                tracing::debug!(
                    conn_id = %conn.id(),
                    "outbound send failed, stopping writer"
                );
                break;
            }
        }
    });
}
