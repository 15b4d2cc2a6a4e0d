//! Directory-backed frame source
//!
//! Reads a directory of pre-encoded still images (one file per frame) into
//! memory and cycles over them in file-name order. Keeping the whole cycle
//! resident trades memory for a broadcast loop that never touches disk.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::frame::Frame;

use super::FrameSource;

/// File extensions recognized as encoded frames
const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Frame source backed by a directory of encoded images
#[derive(Debug)]
pub struct DirectorySource {
    path: PathBuf,
    payloads: Vec<Bytes>,
    position: usize,
    sequence: u64,
}

impl DirectorySource {
    /// Open a media directory
    ///
    /// Every regular file with a recognized image extension becomes one frame;
    /// frames are ordered by file name. Fails with `SourceUnavailable` when
    /// the directory cannot be read or contains no frames.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = std::fs::read_dir(&path).map_err(|e| Error::SourceUnavailable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let mut frame_paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && has_frame_extension(p))
            .collect();
        frame_paths.sort();

        if frame_paths.is_empty() {
            return Err(Error::SourceUnavailable {
                path,
                reason: "directory contains no frame images".into(),
            });
        }

        let mut payloads = Vec::with_capacity(frame_paths.len());
        for frame_path in &frame_paths {
            let data = std::fs::read(frame_path).map_err(|e| Error::SourceUnavailable {
                path: frame_path.clone(),
                reason: e.to_string(),
            })?;
            payloads.push(Bytes::from(data));
        }

        tracing::info!(
            path = %path.display(),
            frames = payloads.len(),
            "media directory opened"
        );

        Ok(Self {
            path,
            payloads,
            position: 0,
            sequence: 0,
        })
    }

    /// Path this source was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

impl FrameSource for DirectorySource {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("framecast-src-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let err = DirectorySource::open("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_empty_directory_is_unavailable() {
        let dir = temp_dir("empty");
        let err = DirectorySource::open(&dir).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_frames_ordered_by_name_and_cycled() {
        let dir = temp_dir("ordered");
        std::fs::write(dir.join("frame_002.jpg"), b"two").unwrap();
        std::fs::write(dir.join("frame_000.jpg"), b"zero").unwrap();
        std::fs::write(dir.join("frame_001.jpg"), b"one").unwrap();
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let mut source = DirectorySource::open(&dir).unwrap();
        assert_eq!(source.frame_count(), 3);

        let payloads: Vec<Bytes> = (0..4).map(|_| source.next_frame().payload).collect();
        assert_eq!(payloads[0].as_ref(), b"zero");
        assert_eq!(payloads[1].as_ref(), b"one");
        assert_eq!(payloads[2].as_ref(), b"two");
        assert_eq!(payloads[3].as_ref(), b"zero");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
