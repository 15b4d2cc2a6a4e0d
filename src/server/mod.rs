//! Broadcast server: paced frame fan-out to connected consumers
//!
//! # Architecture
//!
//! ```text
//!   FrameSource ──► Broadcaster ──┬──► ConsumerSession (write half)
//!        ▲              │         ├──► ConsumerSession
//!   one frame per   Arc<SessionRegistry>
//!   frame period        ▲
//!                       │ status/cursor bookkeeping
//!   consumer lines ─► CommandHandler (one per read half)
//! ```
//!
//! The registry is the single lock for session state: the fan-out pass and
//! the command handlers both go through it, and removal is idempotent so a
//! send failure and a command-channel EOF can clean up the same session
//! concurrently.

pub mod broadcaster;
pub mod command;
pub mod config;
pub mod listener;
pub mod session;

pub use broadcaster::{Broadcaster, PublishOutcome};
pub use command::CommandHandler;
pub use config::ServerConfig;
pub use listener::BroadcastServer;
pub use session::{ConsumerSession, PlaybackStatus, SessionControl, SessionRegistry};
