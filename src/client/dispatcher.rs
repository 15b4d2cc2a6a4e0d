//! Command dispatcher
//!
//! Translates user input into local mode changes and outbound control lines.
//! The local change and the outbound command are deliberately decoupled: the
//! mode switch takes effect immediately against the buffered window, while
//! the server side only records intent (see the broadcaster's playback
//! contract).

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::protocol::Command;

use super::state::{PlaybackMode, SharedPlayer};

/// Maps input tokens to playback actions
pub struct CommandDispatcher<W> {
    player: Arc<SharedPlayer>,
    writer: W,
    analysis_command: Option<Vec<String>>,
}

impl<W> CommandDispatcher<W>
where
    W: AsyncWrite + Unpin,
{
    /// Create a dispatcher writing commands to the server connection
    pub fn new(player: Arc<SharedPlayer>, writer: W, analysis_command: Option<Vec<String>>) -> Self {
        Self {
            player,
            writer,
            analysis_command,
        }
    }

    /// Handle one input token
    ///
    /// Recognized playback tokens change the local mode and notify the
    /// server; `analyze` spawns the external analysis tool; anything else is
    /// ignored. Returns an error only when the command channel write fails.
    pub async fn dispatch(&mut self, input: &str) -> Result<()> {
        match input.trim() {
            "play" => {
                self.player.set_mode(PlaybackMode::Play).await;
                self.send(Command::Play).await
            }
            "pause" => {
                self.player.set_mode(PlaybackMode::Pause).await;
                self.send(Command::Pause).await
            }
            "rewind" => {
                self.player.set_mode(PlaybackMode::Rewind).await;
                self.send(Command::Rewind).await
            }
            // Server-side seek bookkeeping only; the local window is untouched.
            "fast-forward" => self.send(Command::FastForward).await,
            "analyze" => {
                self.spawn_analysis();
                Ok(())
            }
            "" => Ok(()),
            other => {
                tracing::debug!(token = other, "unrecognized input ignored");
                Ok(())
            }
        }
    }

    /// Read input lines until EOF, dispatching each
    pub async fn run<R>(mut self, input: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Err(e) = self.dispatch(&line).await {
                        tracing::warn!(error = %e, "command channel write failed");
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "input source failed");
                    break;
                }
            }
        }
    }

    async fn send(&mut self, command: Command) -> Result<()> {
        self.writer
            .write_all(command.encode().as_bytes())
            .await
            .map_err(Error::ConnectionLost)?;
        self.writer.flush().await.map_err(Error::ConnectionLost)?;
        Ok(())
    }

    /// Launch the external analysis tool, fire-and-forget
    ///
    /// The child is spawned detached and never awaited, so a slow or failing
    /// tool cannot stall playback. No player lock is held here.
    fn spawn_analysis(&self) {
        let Some(command) = self.analysis_command.as_ref() else {
            tracing::debug!("no analysis command configured");
            return;
        };
        let Some((program, args)) = command.split_first() else {
            tracing::debug!("analysis command is empty");
            return;
        };

        match tokio::process::Command::new(program).args(args).spawn() {
            Ok(child) => {
                tracing::info!(program = %program, pid = child.id(), "analysis tool launched");
            }
            Err(e) => {
                tracing::warn!(program = %program, error = %e, "analysis tool failed to launch");
            }
        }
    }
}
