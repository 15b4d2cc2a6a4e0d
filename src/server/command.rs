//! Per-consumer command handling
//!
//! Each accepted connection gets one handler reading the line-oriented
//! command channel. Commands mutate that consumer's recorded control state in
//! the registry; they never touch frame delivery. EOF or a read error ends
//! the handler, which removes the session and releases the connection.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::protocol::Command;

use super::session::{PlaybackStatus, SessionRegistry};

/// Reads playback-control commands from one consumer
pub struct CommandHandler {
    session_id: u64,
    registry: Arc<SessionRegistry>,
    seek_step: u64,
}

impl CommandHandler {
    /// Create a handler for a registered session
    pub fn new(session_id: u64, registry: Arc<SessionRegistry>, seek_step: u64) -> Self {
        Self {
            session_id,
            registry,
            seek_step,
        }
    }

    /// Run until the command channel closes
    ///
    /// Consumes the read half of the consumer's socket. On return the session
    /// has been removed from the registry (idempotently: the broadcast loop
    /// may have pruned it first after a failed send).
    pub async fn run<R>(self, reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match Command::parse(&line) {
                    Some(command) => self.apply(command).await,
                    None => {
                        tracing::debug!(
                            session_id = self.session_id,
                            line = line.trim(),
                            "unrecognized command ignored"
                        );
                    }
                },
                Ok(None) => {
                    tracing::debug!(session_id = self.session_id, "command channel closed");
                    break;
                }
                Err(e) => {
                    tracing::debug!(
                        session_id = self.session_id,
                        error = %e,
                        "command channel read failed"
                    );
                    break;
                }
            }
        }

        self.registry.remove(self.session_id).await;
    }

    /// Apply one command to the session's control state
    async fn apply(&self, command: Command) {
        let step = self.seek_step;
        let applied = self
            .registry
            .update_control(self.session_id, |control| {
                match command {
                    Command::Play => control.status = PlaybackStatus::Play,
                    Command::Pause => control.status = PlaybackStatus::Pause,
                    Command::Rewind => control.rewind(step),
                    Command::FastForward => control.fast_forward(step),
                }
                control.cursor
            })
            .await;

        match applied {
            Some(cursor) => {
                tracing::debug!(
                    session_id = self.session_id,
                    command = %command,
                    cursor = cursor,
                    "command applied"
                );
            }
            None => {
                tracing::debug!(
                    session_id = self.session_id,
                    command = %command,
                    "command for removed session ignored"
                );
            }
        }
    }
}
