//! In-memory frame source
//!
//! Cycles over caller-provided payloads. Used by tests and by demos that
//! generate frames instead of reading them from disk.

use std::path::PathBuf;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::frame::Frame;

use super::FrameSource;

/// Frame source backed by a fixed set of in-memory payloads
#[derive(Debug)]
pub struct MemorySource {
    payloads: Vec<Bytes>,
    position: usize,
    sequence: u64,
}

impl MemorySource {
    /// Create a source from pre-encoded payloads
    ///
    /// Fails with `SourceUnavailable` when given no payloads: an empty cycle
    /// has no first frame to restart from.
    pub fn new(payloads: Vec<Bytes>) -> Result<Self> {
        if payloads.is_empty() {
            return Err(Error::SourceUnavailable {
                path: PathBuf::from("<memory>"),
                reason: "no frames provided".into(),
            });
        }

        Ok(Self {
            payloads,
            position: 0,
            sequence: 0,
        })
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Frame {
        let frame = Frame::new(self.sequence, self.payloads[self.position].clone());
        self.sequence += 1;
        self.position = (self.position + 1) % self.payloads.len();
        frame
    }

    fn frame_count(&self) -> usize {
        self.payloads.len()
    }
}
