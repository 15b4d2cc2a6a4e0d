//! Frame decoding and the renderer seam
//!
//! Decoding turns a compressed payload into RGBA pixels, applying the
//! configured display resize factor. Rendering is an external collaborator
//! behind the [`Renderer`] trait; the playback engine only hands it decoded
//! frames.

use image::imageops::FilterType;

use crate::error::{Error, Result};
use crate::frame::Frame;

/// A decoded frame ready for display
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Sequence number of the source frame
    pub sequence: u64,
    /// Width in pixels after resizing
    pub width: u32,
    /// Height in pixels after resizing
    pub height: u32,
    /// RGBA pixel data (width × height × 4 bytes)
    pub rgba: Vec<u8>,
}

/// Decodes compressed frame payloads into displayable images
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    resize_factor: f32,
}

impl FrameDecoder {
    /// Create a decoder with a display resize factor
    ///
    /// Non-positive factors fall back to 1.0 (no resizing).
    pub fn new(resize_factor: f32) -> Self {
        let resize_factor = if resize_factor > 0.0 {
            resize_factor
        } else {
            1.0
        };
        Self { resize_factor }
    }

    /// Decode one frame, resizing for display
    ///
    /// Fails with [`Error::Decode`] when the payload is not a decodable
    /// image; callers skip such frames and keep playing.
    pub fn decode(&self, frame: &Frame) -> Result<DecodedFrame> {
        let img =
            image::load_from_memory(&frame.payload).map_err(|e| Error::Decode(e.to_string()))?;

        let img = if (self.resize_factor - 1.0).abs() > f32::EPSILON {
            let width = scaled(img.width(), self.resize_factor);
            let height = scaled(img.height(), self.resize_factor);
            img.resize_exact(width, height, FilterType::Triangle)
        } else {
            img
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(DecodedFrame {
            sequence: frame.sequence,
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

fn scaled(dimension: u32, factor: f32) -> u32 {
    ((dimension as f32 * factor).round() as u32).max(1)
}

/// Rendering surface for decoded frames
///
/// Implementations display the frame however the host chooses; the playback
/// engine calls [`render`](Renderer::render) once per frame and yields
/// between calls so the surface stays responsive.
pub trait Renderer: Send {
    /// Display one decoded frame
    fn render(&mut self, frame: &DecodedFrame);
}

/// Renderer that discards frames
///
/// For headless runs and tests that only exercise buffer and cursor logic.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &DecodedFrame) {}
}
