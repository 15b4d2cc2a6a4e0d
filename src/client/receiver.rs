//! Stream receiver
//!
//! Reads the frame channel from the server connection, splits the byte
//! stream into discrete frames via the length prefix, and appends them to
//! the shared buffer. Runs as its own task; terminating here never touches
//! the playback engine, which keeps rendering the buffered window.

use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::error::Error;
use crate::frame::Frame;
use crate::protocol::framing::{read_frame, FrameRead};
use crate::stats::ReceiverStats;

use super::state::SharedPlayer;

/// Appends framed payloads from the server to the shared buffer
pub struct StreamReceiver {
    player: Arc<SharedPlayer>,
    max_frame_size: usize,
    stats: Arc<ReceiverStats>,
}

impl StreamReceiver {
    /// Create a receiver feeding the given shared player
    pub fn new(player: Arc<SharedPlayer>, max_frame_size: usize) -> Self {
        Self {
            player,
            max_frame_size,
            stats: Arc::new(ReceiverStats::default()),
        }
    }

    /// Shared handle to the receiver counters
    pub fn stats(&self) -> Arc<ReceiverStats> {
        Arc::clone(&self.stats)
    }

    /// Run until the connection closes
    ///
    /// Discarded units (oversized, zero-length) are counted and the stream
    /// continues at the next boundary. A close or a truncated stream ends
    /// the task; received frames stay in the buffer for playback.
    pub async fn run<R>(self, mut reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut sequence = 0u64;

        loop {
            match read_frame(&mut reader, self.max_frame_size).await {
                Ok(FrameRead::Payload(payload)) => {
                    self.stats.record_frame(payload.len());
                    self.player.push_frame(Frame::new(sequence, payload)).await;
                    sequence += 1;
                }
                Ok(FrameRead::Skipped { advertised }) => {
                    self.stats.record_framing_error();
                    tracing::warn!(
                        advertised = advertised,
                        max = self.max_frame_size,
                        "frame discarded, resynchronized at next boundary"
                    );
                }
                Err(Error::ConnectionLost(e)) => {
                    tracing::info!(
                        frames_received = sequence,
                        reason = %e,
                        "server connection closed"
                    );
                    break;
                }
                Err(Error::Framing(e)) => {
                    self.stats.record_framing_error();
                    tracing::warn!(error = %e, "stream ended mid-frame");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "receiver stopping");
                    break;
                }
            }
        }
    }
}
