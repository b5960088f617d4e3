//! `WordmoleServer` builder and accept loop.
//!
//! This is the entry point for running the game server. It ties the layers
//! together: the WebSocket transport accepts connections, each connection
//! gets a handler task, and handlers reach rooms through the shared
//! registry. The registry is owned here and injected into handlers — it is
//! constructed at server start and lives exactly as long as the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use wordmole_protocol::JsonCodec;
use wordmole_room::{RoomConfig, RoomRegistry};
use wordmole_transport::{Transport, WebSocketTransport};

use crate::WordmoleError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) registry: Arc<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Wordmole server.
///
/// # Example
///
/// ```rust,no_run
/// use wordmole::WordmoleServerBuilder;
///
/// # async fn run() -> Result<(), wordmole::WordmoleError> {
/// let server = WordmoleServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct WordmoleServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    sweep_interval: Duration,
}

impl WordmoleServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            sweep_interval: Duration::from_secs(30),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration shared by every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets how often idle and finished rooms are reclaimed.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Binds the transport and starts the room sweeper.
    pub async fn build(self) -> Result<WordmoleServer, WordmoleError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let registry = Arc::new(RoomRegistry::new(self.room_config));
        let sweeper = registry.spawn_sweeper(self.sweep_interval);

        let state = Arc::new(ServerState { registry, codec: JsonCodec });

        Ok(WordmoleServer { transport, state, sweeper })
    }
}

impl Default for WordmoleServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Wordmole server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct WordmoleServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
    sweeper: JoinHandle<()>,
}

impl WordmoleServer {
    /// Creates a new builder.
    pub fn builder() -> WordmoleServerBuilder {
        WordmoleServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), WordmoleError> {
        tracing::info!("Wordmole server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

impl Drop for WordmoleServer {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
