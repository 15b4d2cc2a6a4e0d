//! Crate error types
//!
//! Errors are grouped by where they are handled: source errors are fatal at
//! startup, connection errors are recovered locally by removing the affected
//! session, framing and decode errors discard the affected frame and continue.

use std::io;
use std::path::PathBuf;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// The media source could not be opened.
    ///
    /// Fatal: the server must not start broadcasting without a usable source.
    SourceUnavailable {
        /// Path to the media that failed to open
        path: PathBuf,
        /// Human-readable failure description
        reason: String,
    },
    /// The peer closed the connection or a read/write on it failed.
    ///
    /// Recovered locally: the affected session is removed and the affected
    /// task terminates. Never propagated to sibling consumers.
    ConnectionLost(io::Error),
    /// A frame boundary was malformed or truncated
    Framing(FramingError),
    /// Frame bytes did not decode to a displayable image
    Decode(String),
    /// Setup-time I/O failure (bind, accept, process spawn)
    Io(io::Error),
}

/// Frame boundary errors on the frame channel
#[derive(Debug)]
pub enum FramingError {
    /// Length prefix advertises more bytes than the configured maximum
    Oversized {
        /// Advertised payload length
        advertised: usize,
        /// Configured maximum
        max: usize,
    },
    /// Stream ended in the middle of a frame
    Truncated {
        /// Bytes the prefix promised
        expected: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SourceUnavailable { path, reason } => {
                write!(f, "media source unavailable: {}: {}", path.display(), reason)
            }
            Error::ConnectionLost(e) => write!(f, "connection lost: {}", e),
            Error::Framing(e) => write!(f, "framing error: {}", e),
            Error::Decode(reason) => write!(f, "frame decode failed: {}", reason),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::fmt::Display for FramingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingError::Oversized { advertised, max } => {
                write!(f, "frame length {} exceeds maximum {}", advertised, max)
            }
            FramingError::Truncated { expected } => {
                write!(f, "stream ended inside a {}-byte frame", expected)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConnectionLost(e) | Error::Io(e) => Some(e),
            Error::Framing(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for FramingError {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<FramingError> for Error {
    fn from(e: FramingError) -> Self {
        Error::Framing(e)
    }
}
