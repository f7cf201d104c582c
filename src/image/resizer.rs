use super::{NoticeCallback, ResizeOutcome, ResizeService};
use crate::models::{Dimensions, UploadedImage};
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

const JPEG_QUALITY: u8 = 90;

/// Target dimensions for fitting an image inside a caller-supplied bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub needs_resize: bool,
    pub target: Dimensions,
}

impl ResizePlan {
    /// Two-pass clamp: scale down along the dominant axis first, then
    /// re-clamp each axis once more. An extreme aspect ratio can still
    /// exceed the other bound after the first correction, so the second
    /// pass is not optional.
    pub fn compute(source: Dimensions, max_width: u32, max_height: u32) -> Self {
        if source.fits_within(max_width, max_height) {
            return Self {
                needs_resize: false,
                target: source,
            };
        }

        let aspect = source.aspect_ratio();
        let max_w = f64::from(max_width);
        let max_h = f64::from(max_height);
        let mut width = f64::from(source.width);
        let mut height = f64::from(source.height);

        if source.width > source.height {
            if width > max_w {
                width = max_w;
                height = width / aspect;
            }
        } else if height > max_h {
            height = max_h;
            width = height * aspect;
        }

        if height > max_h {
            height = max_h;
            width = height * aspect;
        }
        if width > max_w {
            width = max_w;
            height = width / aspect;
        }

        Self {
            needs_resize: true,
            target: Dimensions::new(width.round() as u32, height.round() as u32),
        }
    }
}

/// Shrinks oversized images to fit upload resolution limits.
///
/// PNG input stays PNG; every other image type is re-encoded as JPEG at
/// quality 90. Files already within bounds are returned untouched.
pub struct ConstraintResizer {
    ticket: AtomicU64,
}

impl ConstraintResizer {
    pub fn new() -> Self {
        Self {
            ticket: AtomicU64::new(0),
        }
    }

    /// Sequence number of the most recently issued resize request.
    ///
    /// A caller that fires a new request while an older one is in flight
    /// compares each outcome's `seq` against this value and drops the
    /// outcome when a newer request has superseded it.
    pub fn latest_seq(&self) -> u64 {
        self.ticket.load(Ordering::Acquire)
    }

    fn output_encoding(media_type: &str) -> (ImageFormat, &'static str, Option<u8>) {
        if media_type == "image/png" {
            (ImageFormat::Png, "image/png", None)
        } else {
            (ImageFormat::Jpeg, "image/jpeg", Some(JPEG_QUALITY))
        }
    }

    fn encode(image: &DynamicImage, format: ImageFormat, quality: Option<u8>) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        match quality {
            Some(q) => {
                // JPEG cannot carry an alpha channel
                let rgb = image.to_rgb8();
                let encoder = JpegEncoder::new_with_quality(&mut buffer, q);
                rgb.write_with_encoder(encoder).map_err(Error::Encode)?;
            }
            None => image.write_to(&mut buffer, format).map_err(Error::Encode)?,
        }
        Ok(buffer.into_inner())
    }
}

impl Default for ConstraintResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResizeService for ConstraintResizer {
    async fn resize(
        &self,
        file: &UploadedImage,
        max_width: u32,
        max_height: u32,
        on_notice: Option<&NoticeCallback>,
    ) -> Result<ResizeOutcome> {
        let seq = self.ticket.fetch_add(1, Ordering::AcqRel) + 1;

        if !file.is_image() {
            debug!(
                "Not an image ({}), passing {} through unchanged",
                file.media_type, file.name
            );
            return Ok(ResizeOutcome {
                seq,
                resized: false,
                file: file.clone(),
                original: None,
                resized_to: None,
            });
        }

        let bytes = file.bytes.clone();
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| Error::Generic(format!("Resize task join error: {}", e)))?
            .map_err(Error::Decode)?;

        let original = Dimensions::new(decoded.width(), decoded.height());
        let plan = ResizePlan::compute(original, max_width, max_height);

        if !plan.needs_resize {
            debug!(
                "Image {} ({}) already fits within {}x{}",
                file.name, original, max_width, max_height
            );
            return Ok(ResizeOutcome {
                seq,
                resized: false,
                file: file.clone(),
                original: Some(original),
                resized_to: None,
            });
        }

        if let Some(notice) = on_notice {
            notice(&format!(
                "Image was too large and will be scaled down to {}",
                plan.target
            ));
        }

        let (format, media_type, quality) = Self::output_encoding(&file.media_type);
        let target = plan.target;
        let encoded = tokio::task::spawn_blocking(move || {
            let scaled = decoded.resize_exact(target.width, target.height, FilterType::Triangle);
            Self::encode(&scaled, format, quality)
        })
        .await
        .map_err(|e| Error::Generic(format!("Resize task join error: {}", e)))??;

        info!(
            "Resized {}: {} -> {} ({:.2} MB)",
            file.name,
            original,
            target,
            encoded.len() as f64 / 1024.0 / 1024.0
        );

        Ok(ResizeOutcome {
            seq,
            resized: true,
            file: UploadedImage::new(file.name.clone(), media_type.to_string(), encoded),
            original: Some(original),
            resized_to: Some(target),
        })
    }
}
