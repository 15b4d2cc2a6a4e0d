//! Wire protocols for the frame and command channels
//!
//! Two independent channels run over each consumer connection:
//!
//! ```text
//!   Server ──────────── frame channel ───────────► Client
//!            {u32 length, big-endian}{payload}
//!
//!   Server ◄─────────── command channel ────────── Client
//!            newline-terminated ASCII tokens
//! ```
//!
//! The frame channel is length-prefixed rather than delimiter-terminated:
//! compressed image payloads can contain any byte sequence, so scanning for a
//! magic marker would mis-split frames whenever the marker bytes happened to
//! appear inside a payload. The length prefix is authoritative and collision
//! free.

pub mod command;
pub mod framing;

pub use command::Command;
pub use framing::{read_frame, write_frame, FrameRead};

/// Default port for the broadcast server
pub const DEFAULT_PORT: u16 = 8000;

/// Size of the length prefix on the frame channel
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default maximum frame payload size (16 MiB)
///
/// Generous for single compressed images; anything larger is treated as a
/// framing error and skipped.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;
