//! PNG export of a captured canvas frame.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::ExportError;

/// A captured frame: tightly packed straight-alpha RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    fn into_image(self) -> Result<RgbaImage, ExportError> {
        let (width, height, len) = (self.width, self.height, self.rgba.len());
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyFrame { width, height, len });
        }
        RgbaImage::from_raw(width, height, self.rgba).ok_or(ExportError::EmptyFrame { width, height, len })
    }
}

/// `thoughtspace-<millis>.png`
pub fn file_name(now_ms: u64) -> String {
    format!("thoughtspace-{now_ms}.png")
}

pub fn encode_png(frame: Frame) -> Result<Vec<u8>, ExportError> {
    let image = frame.into_image()?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Encode `frame` and write it into `dir`. Returns the written path.
pub fn export_png(dir: &Path, frame: Frame, now_ms: u64) -> Result<PathBuf, ExportError> {
    let bytes = encode_png(frame)?;
    let path = dir.join(file_name(now_ms));
    std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&path, &bytes))
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "canvas exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: u32, height: u32) -> Frame {
        Frame {
            width,
            height,
            rgba: vec![200; (width * height * 4) as usize],
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(1_700_000_000_123), "thoughtspace-1700000000123.png");
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(frame(4, 3)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_empty_and_short_frames_rejected() {
        assert!(matches!(encode_png(frame(0, 3)), Err(ExportError::EmptyFrame { .. })));
        let short = Frame {
            width: 4,
            height: 4,
            rgba: vec![0; 10],
        };
        assert!(matches!(encode_png(short), Err(ExportError::EmptyFrame { len: 10, .. })));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_png(dir.path(), frame(2, 2), 42).unwrap();
        assert_eq!(path.file_name().unwrap(), "thoughtspace-42.png");
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 2);
    }
}
