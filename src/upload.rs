//! Image intake and validation.
//!
//! Exactly one file per analysis. Content is sniffed rather than trusted from
//! the file extension; anything that is not a JPEG or PNG under the size limit
//! is rejected here and never reaches the prediction client.

use std::path::Path;

use serde::Serialize;

use crate::error::DermaScanError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// An admitted upload. Owns the image bytes for the lifetime of one analysis;
/// the canonical prediction record takes ownership when the request settles.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime: &'static str,
    pub size_bytes: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

pub fn load_image(path: &Path) -> Result<UploadedImage, DermaScanError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(DermaScanError::ImageRejected(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_IMAGE_BYTES as u64 {
        return Err(DermaScanError::ImageRejected(format!(
            "file is {:.1} MiB, limit is 5 MiB",
            metadata.len() as f64 / (1024.0 * 1024.0)
        )));
    }

    let bytes = std::fs::read(path)?;
    let mime = sniff_mime(&bytes).ok_or_else(|| {
        DermaScanError::ImageRejected("unsupported file type (expected JPG or PNG)".to_string())
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(UploadedImage {
        file_name,
        mime,
        size_bytes: bytes.len(),
        bytes,
    })
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&JPEG_MAGIC) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(&PNG_MAGIC) {
        return Some("image/png");
    }
    None
}
