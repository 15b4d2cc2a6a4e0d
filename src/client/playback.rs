//! Playback engine
//!
//! Advances or retreats the read cursor over the shared buffer according to
//! the current mode and hands decoded frames to the renderer at a fixed
//! cadence. Every iteration yields: rendered frames pace on the render
//! period, idle states bounded-wait on a signal with a timeout. The engine
//! never blocks indefinitely, so it always observes mode changes promptly.

use std::sync::Arc;

use tokio::time::MissedTickBehavior;

use crate::frame::Frame;

use super::config::ClientConfig;
use super::decode::{FrameDecoder, Renderer};
use super::state::{PlaybackMode, SharedPlayer};

/// What one engine iteration decided to do
enum Action {
    /// Decode and render this frame
    Render(Frame),
    /// At the live edge; wait for the receiver to append
    AwaitFrames,
    /// Paused or rewound to 0; wait for a mode change
    AwaitControl,
}

/// Renders buffered frames under the shared playback mode
pub struct PlaybackEngine<R: Renderer> {
    player: Arc<SharedPlayer>,
    decoder: FrameDecoder,
    renderer: R,
    config: ClientConfig,
}

impl<R: Renderer> PlaybackEngine<R> {
    /// Create an engine over shared state and a rendering surface
    pub fn new(player: Arc<SharedPlayer>, config: ClientConfig, renderer: R) -> Self {
        let decoder = FrameDecoder::new(config.resize_factor);
        Self {
            player,
            decoder,
            renderer,
            config,
        }
    }

    /// Run the playback loop
    ///
    /// Runs until the owning task is dropped; playback continues over the
    /// buffered window even after the connection is gone.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.config.render_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            render_rate = self.config.render_rate,
            buffer_capacity = self.config.buffer_capacity,
            "playback engine started"
        );

        loop {
            if self.step().await {
                ticker.tick().await;
            }
        }
    }

    /// One iteration of the state machine
    ///
    /// Returns `true` when a frame was consumed (cursor moved), `false` when
    /// the iteration idled. Idle iterations bounded-wait internally, so
    /// callers can loop without spinning.
    pub async fn step(&mut self) -> bool {
        let action = self
            .player
            .with_state(|state| match state.mode {
                PlaybackMode::Play => state
                    .take_forward()
                    .map(Action::Render)
                    .unwrap_or(Action::AwaitFrames),
                PlaybackMode::Rewind => state
                    .take_backward()
                    .map(Action::Render)
                    .unwrap_or(Action::AwaitControl),
                PlaybackMode::Pause => Action::AwaitControl,
            })
            .await;

        match action {
            Action::Render(frame) => {
                // Decode outside the lock; a bad frame is skipped, not fatal.
                match self.decoder.decode(&frame) {
                    Ok(decoded) => self.renderer.render(&decoded),
                    Err(e) => {
                        tracing::warn!(
                            sequence = frame.sequence,
                            error = %e,
                            "undecodable frame skipped"
                        );
                    }
                }
                true
            }
            Action::AwaitFrames => {
                self.player.wait_for_frames(self.config.idle_tick).await;
                false
            }
            Action::AwaitControl => {
                self.player.wait_for_control(self.config.idle_tick).await;
                false
            }
        }
    }
}
