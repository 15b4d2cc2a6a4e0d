//! Playback client implementation
//!
//! Provides the consumer side of the broadcast:
//! - Receiving and buffering the framed stream
//! - Local playback control over the buffered window
//! - Forwarding control commands to the server

pub mod config;
pub mod decode;
pub mod dispatcher;
pub mod playback;
pub mod receiver;
pub mod state;

pub use config::ClientConfig;
pub use decode::{DecodedFrame, FrameDecoder, NullRenderer, Renderer};
pub use dispatcher::CommandDispatcher;
pub use playback::PlaybackEngine;
pub use receiver::StreamReceiver;
pub use state::{FrameBuffer, PlaybackMode, PlayerState, SharedPlayer};
