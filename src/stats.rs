//! Runtime counters for the broadcast loop and the client receiver

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the broadcast loop
///
/// Updated with relaxed atomics; read via [`BroadcastStats::snapshot`].
#[derive(Debug, Default)]
pub struct BroadcastStats {
    frames_published: AtomicU64,
    bytes_sent: AtomicU64,
    consumers_dropped: AtomicU64,
}

/// Point-in-time copy of [`BroadcastStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSnapshot {
    /// Frames pulled from the source and fanned out
    pub frames_published: u64,
    /// Total payload bytes successfully written to consumers
    pub bytes_sent: u64,
    /// Consumers removed after a failed send
    pub consumers_dropped: u64,
}

impl BroadcastStats {
    /// Record one completed publish pass
    pub fn record_publish(&self, delivered: usize, payload_len: usize, dropped: usize) {
        self.frames_published.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent
            .fetch_add((delivered * payload_len) as u64, Ordering::Relaxed);
        self.consumers_dropped
            .fetch_add(dropped as u64, Ordering::Relaxed);
    }

    /// Read all counters at once
    pub fn snapshot(&self) -> BroadcastSnapshot {
        BroadcastSnapshot {
            frames_published: self.frames_published.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            consumers_dropped: self.consumers_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Counters maintained by the client stream receiver
#[derive(Debug, Default)]
pub struct ReceiverStats {
    frames_received: AtomicU64,
    bytes_received: AtomicU64,
    framing_errors: AtomicU64,
}

/// Point-in-time copy of [`ReceiverStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverSnapshot {
    /// Complete frames appended to the buffer
    pub frames_received: u64,
    /// Total payload bytes received
    pub bytes_received: u64,
    /// Units discarded for framing reasons
    pub framing_errors: u64,
}

impl ReceiverStats {
    /// Record one complete frame
    pub fn record_frame(&self, payload_len: usize) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(payload_len as u64, Ordering::Relaxed);
    }

    /// Record a discarded unit
    pub fn record_framing_error(&self) {
        self.framing_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters at once
    pub fn snapshot(&self) -> ReceiverSnapshot {
        ReceiverSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            framing_errors: self.framing_errors.load(Ordering::Relaxed),
        }
    }
}
