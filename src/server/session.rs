//! Consumer sessions and the session registry
//!
//! One [`ConsumerSession`] exists per connected consumer and owns the write
//! half of its socket. The [`SessionRegistry`] is the single lock for all
//! session state: the broadcast loop iterates it to fan out frames, and the
//! per-consumer command handlers mutate it to record playback intent. Removal
//! is idempotent and keyed by session id, so the broadcaster pruning a dead
//! session and its command handler cleaning up after EOF can race safely.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::frame::Frame;
use crate::protocol::framing;

/// Recorded playback status of a consumer
///
/// Advisory: the broadcast loop pushes identical frames to every consumer
/// regardless of status. See [`Broadcaster`](super::Broadcaster) for the
/// client-local playback contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Consumer reports it is playing
    Play,
    /// Consumer reports it is holding position
    Pause,
}

/// Playback-control bookkeeping for one consumer
///
/// `delivered` counts frames successfully sent to this consumer and stands in
/// for the consumer's recorded buffer length when clamping seeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionControl {
    /// Recorded playback status
    pub status: PlaybackStatus,
    /// Tracked cursor into the consumer's buffered window
    pub cursor: u64,
    /// Frames successfully delivered to this consumer
    pub delivered: u64,
}

impl SessionControl {
    /// Initial state for a freshly accepted consumer
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Play,
            cursor: 0,
            delivered: 0,
        }
    }

    /// Step the cursor back, clamped at 0, and record a pause
    pub fn rewind(&mut self, step: u64) {
        self.status = PlaybackStatus::Pause;
        self.cursor = self.cursor.saturating_sub(step);
    }

    /// Step the cursor forward, clamped at the last delivered frame, and
    /// record a pause
    pub fn fast_forward(&mut self, step: u64) {
        self.status = PlaybackStatus::Pause;
        let live_edge = self.delivered.saturating_sub(1);
        self.cursor = self.cursor.saturating_add(step).min(live_edge);
    }
}

impl Default for SessionControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Server-side record of one connected consumer
#[derive(Debug)]
pub struct ConsumerSession {
    /// Unique session id
    pub id: u64,

    /// Remote peer address
    pub peer_addr: SocketAddr,

    /// Connection start time
    pub connected_at: Instant,

    /// Playback-control bookkeeping
    pub control: SessionControl,

    /// Write half of the consumer's socket (frame channel)
    writer: OwnedWriteHalf,
}

impl ConsumerSession {
    /// Create a session for a freshly accepted connection
    pub fn new(id: u64, peer_addr: SocketAddr, writer: OwnedWriteHalf) -> Self {
        Self {
            id,
            peer_addr,
            connected_at: Instant::now(),
            control: SessionControl::new(),
            writer,
        }
    }

    /// Send one frame on this consumer's frame channel
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        framing::write_frame(&mut self.writer, frame).await
    }

    /// Session duration so far
    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }
}

/// Registry of all connected consumers
///
/// Thread-safe via a single `Mutex`: every fan-out pass and every command
/// mutation runs under it, so structural modification never races iteration.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<u64, ConsumerSession>>,
    next_session_id: AtomicU64,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Register a new consumer and return its session id
    ///
    /// The consumer becomes eligible for the next publish pass; no backlog
    /// catch-up is provided, so late joiners start at the live edge.
    pub async fn register(&self, peer_addr: SocketAddr, writer: OwnedWriteHalf) -> u64 {
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let session = ConsumerSession::new(id, peer_addr, writer);

        let mut sessions = self.sessions.lock().await;
        sessions.insert(id, session);

        tracing::info!(
            session_id = id,
            peer = %peer_addr,
            consumers = sessions.len(),
            "consumer registered"
        );

        id
    }

    /// Remove a consumer
    ///
    /// Idempotent: returns `false` when the session was already removed, for
    /// example by the broadcast loop after a failed send.
    pub async fn remove(&self, id: u64) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.remove(&id) {
            Some(session) => {
                tracing::info!(
                    session_id = id,
                    peer = %session.peer_addr,
                    duration_secs = session.duration().as_secs(),
                    consumers = sessions.len(),
                    "consumer removed"
                );
                true
            }
            None => false,
        }
    }

    /// Apply a mutation to one session's control state
    ///
    /// Returns `None` when the session no longer exists.
    pub async fn update_control<F, T>(&self, id: u64, f: F) -> Option<T>
    where
        F: FnOnce(&mut SessionControl) -> T,
    {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(&id).map(|session| f(&mut session.control))
    }

    /// Read one session's control state
    pub async fn control(&self, id: u64) -> Option<SessionControl> {
        let sessions = self.sessions.lock().await;
        sessions.get(&id).map(|session| session.control)
    }

    /// Number of registered consumers
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no consumers are registered
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Exclusive access to the session map for a fan-out pass
    pub(crate) async fn lock_sessions(
        &self,
    ) -> tokio::sync::MutexGuard<'_, HashMap<u64, ConsumerSession>> {
        self.sessions.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::net::{TcpListener, TcpStream};

    /// Open a connected socket pair and return the server-side write half.
    async fn write_half() -> (OwnedWriteHalf, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).await.unwrap();
        let (server_side, _) = listener.accept().await.unwrap();
        let (_, writer) = server_side.into_split();
        (writer, client)
    }

    #[test]
    fn test_rewind_clamps_at_zero() {
        let mut control = SessionControl::new();
        control.cursor = 12;
        control.delivered = 40;

        control.rewind(10);
        assert_eq!(control.cursor, 2);
        assert_eq!(control.status, PlaybackStatus::Pause);

        // Second rewind from 2 clamps at 0, not -8.
        control.rewind(10);
        assert_eq!(control.cursor, 0);
    }

    #[test]
    fn test_fast_forward_clamps_at_live_edge() {
        let mut control = SessionControl::new();
        control.cursor = 29;
        control.delivered = 30;

        control.fast_forward(10);
        assert_eq!(control.cursor, 29);
        assert_eq!(control.status, PlaybackStatus::Pause);
    }

    #[test]
    fn test_fast_forward_with_nothing_delivered() {
        let mut control = SessionControl::new();
        control.fast_forward(10);
        assert_eq!(control.cursor, 0);
    }

    #[tokio::test]
    async fn test_register_and_idempotent_remove() {
        let registry = SessionRegistry::new();
        let (writer, _client) = write_half().await;
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();

        let id = registry.register(peer, writer).await;
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_control_on_live_and_dead_session() {
        let registry = SessionRegistry::new();
        let (writer, _client) = write_half().await;
        let peer: SocketAddr = "127.0.0.1:40001".parse().unwrap();

        let id = registry.register(peer, writer).await;

        let cursor = registry
            .update_control(id, |control| {
                control.delivered = 20;
                control.fast_forward(10);
                control.cursor
            })
            .await;
        assert_eq!(cursor, Some(10));

        registry.remove(id).await;
        assert!(registry.update_control(id, |c| c.cursor).await.is_none());
    }
}
