//! Length-prefixed framing for the frame channel
//!
//! Each unit on the wire is `{u32 length, big-endian}{payload}`. The length
//! counts payload bytes only. A reader that trusts the prefix can always find
//! the next boundary, even when a frame has to be discarded: skipping exactly
//! `length` bytes re-synchronizes the stream at the next prefix.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, FramingError, Result};
use crate::frame::Frame;

use super::{DEFAULT_MAX_FRAME_SIZE, LENGTH_PREFIX_SIZE};

/// Outcome of reading one unit from the frame channel
#[derive(Debug)]
pub enum FrameRead {
    /// A complete payload
    Payload(Bytes),
    /// A unit that was discarded; the stream is positioned at the next prefix
    Skipped {
        /// Length the discarded unit advertised
        advertised: usize,
    },
}

/// Write one frame as a length-prefixed unit
///
/// Rejects payloads above [`DEFAULT_MAX_FRAME_SIZE`] so a bad producer cannot
/// emit units that every receiver would have to discard.
pub async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = frame.payload.len();
    if len > DEFAULT_MAX_FRAME_SIZE {
        return Err(Error::Framing(FramingError::Oversized {
            advertised: len,
            max: DEFAULT_MAX_FRAME_SIZE,
        }));
    }

    writer
        .write_all(&(len as u32).to_be_bytes())
        .await
        .map_err(Error::ConnectionLost)?;
    writer
        .write_all(&frame.payload)
        .await
        .map_err(Error::ConnectionLost)?;
    writer.flush().await.map_err(Error::ConnectionLost)?;

    Ok(())
}

/// Read one unit from the frame channel
///
/// Returns [`FrameRead::Payload`] for a complete frame. Zero-length units and
/// units advertising more than `max_frame_size` bytes are consumed and
/// reported as [`FrameRead::Skipped`]; the reader is then positioned at the
/// next prefix. An end-of-stream at a unit boundary is a clean close
/// ([`Error::ConnectionLost`]); an end-of-stream inside a unit is
/// [`FramingError::Truncated`].
pub async fn read_frame<R>(reader: &mut R, max_frame_size: usize) -> Result<FrameRead>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader
        .read_exact(&mut prefix)
        .await
        .map_err(Error::ConnectionLost)?;
    let len = u32::from_be_bytes(prefix) as usize;

    if len == 0 {
        return Ok(FrameRead::Skipped { advertised: 0 });
    }

    if len > max_frame_size {
        // Discard exactly the advertised bytes to land on the next prefix.
        let mut remaining = len;
        let mut scratch = [0u8; 8192];
        while remaining > 0 {
            let chunk = scratch.len().min(remaining);
            let read = reader
                .read(&mut scratch[..chunk])
                .await
                .map_err(Error::ConnectionLost)?;
            if read == 0 {
                return Err(Error::Framing(FramingError::Truncated { expected: len }));
            }
            remaining -= read;
        }
        return Ok(FrameRead::Skipped { advertised: len });
    }

    let mut payload = vec![0u8; len];
    if reader.read_exact(&mut payload).await.is_err() {
        return Err(Error::Framing(FramingError::Truncated { expected: len }));
    }

    Ok(FrameRead::Payload(Bytes::from(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn roundtrip(payload: &[u8]) -> Bytes {
        let frame = Frame::new(0, Bytes::copy_from_slice(payload));

        let mut wire = Vec::new();
        write_frame(&mut wire, &frame).await.unwrap();

        let mut cursor = std::io::Cursor::new(wire);
        match read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE).await.unwrap() {
            FrameRead::Payload(bytes) => bytes,
            other => panic!("expected payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_roundtrip_is_byte_identical() {
        let payload = b"\xff\xd8\xff\xe0 jpeg-ish bytes \xff\xd9";
        assert_eq!(roundtrip(payload).await.as_ref(), payload);
    }

    #[tokio::test]
    async fn test_roundtrip_with_marker_bytes_in_payload() {
        // Payloads that embed a magic-marker string or bytes that look like a
        // length prefix must survive intact; only the prefix delimits frames.
        let payload = b"headEND\x00\x00\x00\x05ENDtail";
        assert_eq!(roundtrip(payload).await.as_ref(), payload);
    }

    #[tokio::test]
    async fn test_consecutive_frames_keep_boundaries() {
        let first = Frame::new(0, Bytes::from_static(b"first END frame"));
        let second = Frame::new(1, Bytes::from_static(b"second"));

        let mut wire = Vec::new();
        write_frame(&mut wire, &first).await.unwrap();
        write_frame(&mut wire, &second).await.unwrap();

        let mut cursor = std::io::Cursor::new(wire);
        let a = read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE).await.unwrap();
        let b = read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE).await.unwrap();

        assert!(matches!(a, FrameRead::Payload(p) if p == first.payload));
        assert!(matches!(b, FrameRead::Payload(p) if p == second.payload));
    }

    #[tokio::test]
    async fn test_eof_at_boundary_is_connection_lost() {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let err = read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConnectionLost(_)));
    }

    #[tokio::test]
    async fn test_eof_inside_frame_is_truncated() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&8u32.to_be_bytes());
        wire.extend_from_slice(b"only4");

        let mut cursor = std::io::Cursor::new(wire);
        let err = read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Framing(FramingError::Truncated { expected: 8 })
        ));
    }

    #[tokio::test]
    async fn test_oversized_frame_skipped_and_stream_resyncs() {
        let mut wire = Vec::new();
        // Oversized unit: 64 bytes advertised against a 16-byte maximum.
        wire.extend_from_slice(&64u32.to_be_bytes());
        wire.extend_from_slice(&[0xAA; 64]);
        // Valid unit after it.
        wire.extend_from_slice(&3u32.to_be_bytes());
        wire.extend_from_slice(b"ok!");

        let mut cursor = std::io::Cursor::new(wire);

        let skipped = read_frame(&mut cursor, 16).await.unwrap();
        assert!(matches!(skipped, FrameRead::Skipped { advertised: 64 }));

        let next = read_frame(&mut cursor, 16).await.unwrap();
        assert!(matches!(next, FrameRead::Payload(p) if p.as_ref() == b"ok!"));
    }

    #[tokio::test]
    async fn test_zero_length_unit_skipped() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&0u32.to_be_bytes());
        wire.extend_from_slice(&2u32.to_be_bytes());
        wire.extend_from_slice(b"ab");

        let mut cursor = std::io::Cursor::new(wire);

        let skipped = read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE).await.unwrap();
        assert!(matches!(skipped, FrameRead::Skipped { advertised: 0 }));

        let next = read_frame(&mut cursor, DEFAULT_MAX_FRAME_SIZE).await.unwrap();
        assert!(matches!(next, FrameRead::Payload(p) if p.as_ref() == b"ab"));
    }

    #[tokio::test]
    async fn test_write_rejects_oversized_payload() {
        let frame = Frame::new(0, Bytes::from(vec![0u8; DEFAULT_MAX_FRAME_SIZE + 1]));
        let mut wire = Vec::new();
        let err = write_frame(&mut wire, &frame).await.unwrap_err();
        assert!(matches!(err, Error::Framing(FramingError::Oversized { .. })));
        assert!(wire.is_empty());
    }
}
