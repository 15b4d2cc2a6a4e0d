//! Frame type shared by the producer and consumers

use bytes::Bytes;

/// One encoded video frame
///
/// The payload is a single compressed image. Frames are immutable once
/// created and cheap to clone: `Bytes` is reference-counted, so a broadcast
/// fan-out shares one allocation across every consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position in production order
    pub sequence: u64,
    /// Compressed image bytes
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame from its sequence number and encoded payload
    pub fn new(sequence: u64, payload: Bytes) -> Self {
        Self { sequence, payload }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_payload() {
        let frame = Frame::new(7, Bytes::from(vec![1u8; 1024]));
        let copy = frame.clone();

        assert_eq!(copy.sequence, 7);
        assert_eq!(copy.payload.as_ptr(), frame.payload.as_ptr());
    }
}
