//! Paced frame fan-out
//!
//! The broadcaster owns the frame source and pushes each produced frame to
//! every registered consumer.
//!
//! # Playback contract
//!
//! Playback control is client-local. Every consumer receives the identical
//! frame stream regardless of its recorded status or cursor; the command
//! channel only updates per-session bookkeeping
//! ([`SessionControl`](super::session::SessionControl)) so consumer intent is
//! observable on the server. A paused consumer therefore keeps receiving
//! frames and buffers them locally.

use std::sync::Arc;

use tokio::time::MissedTickBehavior;

use crate::frame::Frame;
use crate::source::FrameSource;
use crate::stats::BroadcastStats;

use super::config::ServerConfig;
use super::session::SessionRegistry;

/// Result of one fan-out pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Consumers that received the frame
    pub delivered: usize,
    /// Consumers removed after a failed send
    pub dropped: usize,
}

/// Pushes each produced frame to every registered consumer
pub struct Broadcaster<S: FrameSource> {
    source: S,
    registry: Arc<SessionRegistry>,
    config: ServerConfig,
    stats: Arc<BroadcastStats>,
}

impl<S: FrameSource> Broadcaster<S> {
    /// Create a broadcaster over a source and a consumer registry
    pub fn new(source: S, registry: Arc<SessionRegistry>, config: ServerConfig) -> Self {
        Self::with_stats(source, registry, config, Arc::new(BroadcastStats::default()))
    }

    /// Create a broadcaster that records into shared counters
    pub fn with_stats(
        source: S,
        registry: Arc<SessionRegistry>,
        config: ServerConfig,
        stats: Arc<BroadcastStats>,
    ) -> Self {
        Self {
            source,
            registry,
            config,
            stats,
        }
    }

    /// Shared handle to the broadcast counters
    pub fn stats(&self) -> Arc<BroadcastStats> {
        Arc::clone(&self.stats)
    }

    /// Run the broadcast loop
    ///
    /// One frame is pulled from the source and published per frame period.
    /// A pass that overruns the period makes the next publish proceed
    /// immediately, without burst catch-up or frame dropping; drift under
    /// load is accepted.
    pub async fn run(mut self) {
        let period = self.config.frame_period();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            frame_rate = self.config.frame_rate,
            cycle_frames = self.source.frame_count(),
            "broadcast loop started"
        );

        loop {
            ticker.tick().await;

            let frame = self.source.next_frame();
            let payload_len = frame.len();
            let outcome = self.publish(&frame).await;

            self.stats
                .record_publish(outcome.delivered, payload_len, outcome.dropped);
        }
    }

    /// Fan one frame out to every registered consumer
    ///
    /// A failed send marks that consumer for removal instead of aborting the
    /// pass; one bad consumer never stalls or fails delivery to the others.
    /// Removals are applied after the full pass completes.
    pub async fn publish(&self, frame: &Frame) -> PublishOutcome {
        let mut sessions = self.registry.lock_sessions().await;

        let mut delivered = 0usize;
        let mut failed: Vec<u64> = Vec::new();

        for (id, session) in sessions.iter_mut() {
            match session.send_frame(frame).await {
                Ok(()) => {
                    session.control.delivered += 1;
                    delivered += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        session_id = *id,
                        sequence = frame.sequence,
                        error = %e,
                        "send failed, marking consumer for removal"
                    );
                    failed.push(*id);
                }
            }
        }

        for id in &failed {
            if sessions.remove(id).is_some() {
                tracing::info!(session_id = id, "consumer dropped after send failure");
            }
        }

        PublishOutcome {
            delivered,
            dropped: failed.len(),
        }
    }
}
