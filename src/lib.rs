//! Frame broadcast server and playback client
//!
//! `framecast` distributes a video's frames from one producer to many
//! consumers over persistent TCP connections and gives each consumer
//! independent local playback control (play, pause, rewind) over a bounded
//! window of received frames.
//!
//! # Architecture
//!
//! ```text
//!  Producer process                      Consumer process (×N)
//!  ┌──────────────────────────┐          ┌───────────────────────────────┐
//!  │ FrameSource              │          │ StreamReceiver                │
//!  │   └► Broadcaster ────────┼── TCP ──►│   └► FrameBuffer (ring, ≤C)   │
//!  │        Arc<SessionRegistry>         │        └► PlaybackEngine ──► Renderer
//!  │        ▲                 │          │             ▲                 │
//!  │ CommandHandler (per conn)│◄── TCP ──┼── CommandDispatcher ◄── input │
//!  └──────────────────────────┘          └───────────────────────────────┘
//! ```
//!
//! Frames travel as `{u32 length, big-endian}{payload}` units; commands as
//! newline-terminated ASCII tokens. Delivery is push-based and best-effort:
//! there is no acknowledgment or retransmission, and a consumer that loses
//! its connection simply stops receiving while continuing to play its
//! buffered window.
//!
//! # Zero-copy fan-out
//!
//! Frame payloads are `bytes::Bytes`, so fanning one frame out to N
//! consumers clones a reference count, not the pixel data.

pub mod client;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod server;
pub mod source;
pub mod stats;

pub use client::{ClientConfig, CommandDispatcher, PlaybackEngine, SharedPlayer, StreamReceiver};
pub use error::{Error, FramingError, Result};
pub use frame::Frame;
pub use protocol::Command;
pub use server::{BroadcastServer, Broadcaster, ServerConfig, SessionRegistry};
pub use source::{DirectorySource, FrameSource, MemorySource};
