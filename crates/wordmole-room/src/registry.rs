//! Room registry: creates rooms on first join and reclaims dead ones.
//!
//! The registry is the only state shared across rooms. It is constructed by
//! the server at startup and injected into connection handlers — there is no
//! global room table. Lookup keys are the normalized form of the room code;
//! the display form is whatever the creating player typed (trimmed).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{RoomConfig, RoomHandle};

/// Command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns every active room, keyed by normalized room code.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, RoomHandle>>,
    config: RoomConfig,
}

impl RoomRegistry {
    /// Creates an empty registry whose rooms share `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self { rooms: Mutex::new(HashMap::new()), config }
    }

    /// The matching key for a room code: trimmed, case-folded.
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Returns the room for `code`, creating it in the lobby phase if it
    /// doesn't exist.
    ///
    /// Creation happens under the registry lock, so two connections racing
    /// to join the same unseen code observe exactly one room. A handle whose
    /// actor has already stopped (reclaimed between lookups) is replaced
    /// with a fresh room.
    pub async fn get_or_create(&self, code: &str) -> RoomHandle {
        let key = Self::normalize(code);
        let mut rooms = self.rooms.lock().await;

        if let Some(handle) = rooms.get(&key) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }

        let handle = spawn_room(
            code.trim().to_string(),
            self.config.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        tracing::info!(code = %key, "room created");
        rooms.insert(key, handle.clone());
        handle
    }

    /// Looks up an existing, live room.
    pub async fn get(&self, code: &str) -> Option<RoomHandle> {
        let key = Self::normalize(code);
        let rooms = self.rooms.lock().await;
        rooms.get(&key).filter(|h| !h.is_closed()).cloned()
    }

    /// Removes and shuts down the room for `code`. Returns whether a room
    /// was removed.
    pub async fn remove(&self, code: &str) -> bool {
        let key = Self::normalize(code);
        let handle = self.rooms.lock().await.remove(&key);
        match handle {
            Some(handle) => {
                let _ = handle.shutdown().await;
                tracing::info!(code = %key, "room removed");
                true
            }
            None => false,
        }
    }

    /// Number of rooms currently tracked.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// Reclaims dead rooms: finished games, rooms whose players are all
    /// gone, and rooms idle past the configured timeout. Returns how many
    /// were removed.
    ///
    /// Room state is read through each actor's command channel, so the sweep
    /// serializes with in-flight player actions and cannot observe a room
    /// mid-mutation.
    pub async fn sweep(&self) -> usize {
        let snapshot: Vec<(String, RoomHandle)> = self
            .rooms
            .lock()
            .await
            .iter()
            .map(|(k, h)| (k.clone(), h.clone()))
            .collect();

        let mut dead = Vec::new();
        for (key, handle) in snapshot {
            match handle.info().await {
                Ok(info) => {
                    let abandoned = info.active_players == 0
                        && info.idle_for >= self.config.empty_room_grace;
                    if abandoned
                        || info.phase.is_terminal()
                        || info.idle_for >= self.config.idle_timeout
                    {
                        let _ = handle.shutdown().await;
                        dead.push(key);
                    }
                }
                // Actor already gone; just drop the handle.
                Err(_) => dead.push(key),
            }
        }

        let mut removed = 0;
        let mut rooms = self.rooms.lock().await;
        for key in dead {
            if rooms.remove(&key).is_some() {
                tracing::info!(code = %key, "room reclaimed");
                removed += 1;
            }
        }
        removed
    }

    /// Spawns a background task sweeping this registry every `every`.
    ///
    /// The task runs for the life of the process; the returned handle can be
    /// aborted for a controlled shutdown.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        every: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(
                tokio::time::MissedTickBehavior::Delay,
            );
            // The first tick fires immediately; skip it so a just-started
            // server doesn't sweep an empty registry for nothing.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = registry.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "idle room sweep");
                }
            }
        })
    }
}
