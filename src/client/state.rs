//! Shared playback state
//!
//! The frame buffer, the playback mode, and the read cursor are shared
//! between three tasks: the stream receiver appends (writer), the playback
//! engine reads frames and moves the cursor, and the command dispatcher
//! switches modes. One mutex guards all of it, and every read-modify-write
//! (length check, frame read, cursor move, eviction adjustment) is a single
//! critical section, so the engine can never observe an index invalidated by
//! a concurrent eviction.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

use crate::frame::Frame;

/// Client playback mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Advance the cursor and render forward
    Play,
    /// Hold position and render nothing
    Pause,
    /// Step the cursor backward and render in reverse
    Rewind,
}

/// Ordered, bounded ring of received frames
///
/// Append-only at the tail; at capacity each push evicts the head. Indices
/// are offsets into the current window, not absolute stream positions, so an
/// eviction shifts what every index refers to.
#[derive(Debug)]
pub struct FrameBuffer {
    frames: VecDeque<Frame>,
    capacity: usize,
}

impl FrameBuffer {
    /// Create a buffer holding at most `capacity` frames
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a frame, evicting the oldest when full
    ///
    /// Returns `true` when an eviction happened.
    pub fn push(&mut self, frame: Frame) -> bool {
        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front();
            true
        } else {
            false
        };
        self.frames.push_back(frame);
        evicted
    }

    /// Frame at a window offset
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Number of buffered frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Mode, cursor, and buffer of one playing client
#[derive(Debug)]
pub struct PlayerState {
    /// Received-frame window
    pub buffer: FrameBuffer,
    /// Current playback mode
    pub mode: PlaybackMode,
    /// Next window offset to render
    pub cursor: usize,
}

impl PlayerState {
    /// Create a fresh state in `Play` mode
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            buffer: FrameBuffer::with_capacity(buffer_capacity),
            mode: PlaybackMode::Play,
            cursor: 0,
        }
    }

    /// Append a received frame, keeping the cursor on the frame it addressed
    ///
    /// When the push evicts the head, every offset shifts down by one; a
    /// cursor above 0 moves with its frame, a cursor at 0 stays on the new
    /// oldest frame.
    pub fn push_frame(&mut self, frame: Frame) {
        if self.buffer.push(frame) {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Take the frame at the cursor and advance, or `None` at the live edge
    pub fn take_forward(&mut self) -> Option<Frame> {
        let frame = self.buffer.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(frame)
    }

    /// Retreat the cursor and take the frame now under it, or `None` at 0
    pub fn take_backward(&mut self) -> Option<Frame> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.buffer.get(self.cursor).cloned()
    }
}

/// Playback state shared between receiver, engine, and dispatcher
///
/// `Notify` signals replace fixed-sleep polling: the receiver pings
/// `frames_available` after every append and the dispatcher pings `control`
/// after every mode change. Waiters always pair the signal with a timeout, so
/// a missed wakeup costs one tick, never liveness.
#[derive(Debug)]
pub struct SharedPlayer {
    state: Mutex<PlayerState>,
    frames_available: Notify,
    control: Notify,
}

impl SharedPlayer {
    /// Create shared state with the given buffer capacity
    pub fn new(buffer_capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PlayerState::new(buffer_capacity)),
            frames_available: Notify::new(),
            control: Notify::new(),
        })
    }

    /// Run a closure under the player lock
    pub async fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut PlayerState) -> T,
    {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Append a received frame and wake the playback engine
    pub async fn push_frame(&self, frame: Frame) {
        {
            let mut state = self.state.lock().await;
            state.push_frame(frame);
        }
        self.frames_available.notify_waiters();
    }

    /// Switch playback mode and wake the playback engine
    pub async fn set_mode(&self, mode: PlaybackMode) {
        {
            let mut state = self.state.lock().await;
            if state.mode == mode {
                return;
            }
            state.mode = mode;
            tracing::debug!(mode = ?mode, "playback mode changed");
        }
        self.control.notify_waiters();
    }

    /// Current playback mode
    pub async fn mode(&self) -> PlaybackMode {
        self.state.lock().await.mode
    }

    /// Current buffered frame count
    pub async fn buffered(&self) -> usize {
        self.state.lock().await.buffer.len()
    }

    /// Wait for a new frame, bounded by `tick`
    pub async fn wait_for_frames(&self, tick: Duration) {
        let _ = tokio::time::timeout(tick, self.frames_available.notified()).await;
    }

    /// Wait for a mode change, bounded by `tick`
    pub async fn wait_for_control(&self, tick: Duration) {
        let _ = tokio::time::timeout(tick, self.control.notified()).await;
    }
}
