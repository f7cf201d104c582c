//! Media type detection from file content.
//!
//! A browser supplies a declared type with every selected file; a CLI has
//! to derive one. Unrecognized content falls back to a non-image type so
//! the resizer's pass-through path engages instead of a decode attempt.

pub fn detect_media_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x42, 0x4D, ..] => "image/bmp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => {
            tracing::warn!(
                "Unrecognized file content (first 4 bytes: {:02X?}), treating as non-image",
                &bytes[..bytes.len().min(4)]
            );
            "application/octet-stream"
        }
    }
}
