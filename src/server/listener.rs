//! Broadcast server listener
//!
//! Handles the TCP accept loop, registers one consumer session per
//! connection, and spawns its command handler.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::error::Result;
use crate::source::FrameSource;
use crate::stats::BroadcastStats;

use super::broadcaster::Broadcaster;
use super::command::CommandHandler;
use super::config::ServerConfig;
use super::session::SessionRegistry;

/// Frame broadcast server
///
/// Accepts consumer connections indefinitely. Each accepted connection is
/// split: the write half joins the [`SessionRegistry`] for frame fan-out, and
/// the read half feeds a [`CommandHandler`] task. The broadcast loop runs
/// alongside the accept loop and is stopped when the server returns.
pub struct BroadcastServer {
    config: ServerConfig,
    registry: Arc<SessionRegistry>,
    stats: Arc<BroadcastStats>,
    connection_semaphore: Option<Arc<Semaphore>>,
}

impl BroadcastServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Self {
            config,
            registry: Arc::new(SessionRegistry::new()),
            stats: Arc::new(BroadcastStats::default()),
            connection_semaphore,
        }
    }

    /// Get a reference to the session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Get a reference to the broadcast counters
    pub fn stats(&self) -> &Arc<BroadcastStats> {
        &self.stats
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// Binds the configured address, starts the broadcast loop over `source`,
    /// and accepts consumers indefinitely. The source must already be open:
    /// construction is where `SourceUnavailable` surfaces, so a server never
    /// starts broadcasting without usable media.
    pub async fn run<S>(&self, source: S) -> Result<()>
    where
        S: FrameSource + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.run_with_listener(listener, source).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<S, F>(&self, source: S, shutdown: F) -> Result<()>
    where
        S: FrameSource + 'static,
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "broadcast server listening");

        let broadcast_handle = self.spawn_broadcaster(source);

        let result = tokio::select! {
            _ = shutdown => {
                tracing::info!("shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        };

        broadcast_handle.abort();
        result
    }

    /// Run the server on an already-bound listener
    ///
    /// Useful when the caller needs the ephemeral port before the server
    /// starts (the listener's local address wins over `config.bind_addr`).
    pub async fn run_with_listener<S>(&self, listener: TcpListener, source: S) -> Result<()>
    where
        S: FrameSource + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(addr = %addr, "broadcast server listening");
        }

        let broadcast_handle = self.spawn_broadcaster(source);
        let result = self.accept_loop(&listener).await;
        broadcast_handle.abort();
        result
    }

    fn spawn_broadcaster<S>(&self, source: S) -> tokio::task::JoinHandle<()>
    where
        S: FrameSource + 'static,
    {
        let broadcaster = Broadcaster::with_stats(
            source,
            Arc::clone(&self.registry),
            self.config.clone(),
            Arc::clone(&self.stats),
        );
        tokio::spawn(broadcaster.run())
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept connection");
                }
            }
        }
    }

    async fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match sem.clone().try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::warn!(peer = %peer_addr, error = %e, "failed to set TCP_NODELAY");
            }
        }

        let (read_half, write_half) = socket.into_split();
        let session_id = self.registry.register(peer_addr, write_half).await;

        let handler = CommandHandler::new(
            session_id,
            Arc::clone(&self.registry),
            self.config.seek_step,
        );

        tokio::spawn(async move {
            // Permit is held for the lifetime of the connection.
            let _permit = permit;
            handler.run(read_half).await;
            tracing::debug!(session_id = session_id, "connection closed");
        });
    }
}
