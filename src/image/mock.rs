use super::{NoticeCallback, ResizeOutcome, ResizeService};
use crate::models::{Dimensions, UploadedImage};
use crate::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Test double that passes files through without touching pixels.
#[derive(Clone)]
pub struct MockResizer {
    resize_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    forced_dimensions: Arc<Mutex<Option<(Dimensions, Dimensions)>>>,
    ticket: Arc<AtomicU64>,
}

impl MockResizer {
    pub fn new() -> Self {
        Self {
            resize_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            forced_dimensions: Arc::new(Mutex::new(None)),
            ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Pretend the file was resized from `original` down to `target`.
    pub fn with_resize(self, original: Dimensions, target: Dimensions) -> Self {
        *self.forced_dimensions.lock().unwrap() = Some((original, target));
        self
    }

    pub fn get_resize_count(&self) -> usize {
        *self.resize_count.lock().unwrap()
    }
}

impl Default for MockResizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResizeService for MockResizer {
    async fn resize(
        &self,
        file: &UploadedImage,
        _max_width: u32,
        _max_height: u32,
        on_notice: Option<&NoticeCallback>,
    ) -> Result<ResizeOutcome> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Decode(image::ImageError::IoError(
                std::io::Error::other("Mock decode failure"),
            )));
        }

        let mut count = self.resize_count.lock().unwrap();
        *count += 1;

        let seq = self.ticket.fetch_add(1, Ordering::AcqRel) + 1;

        if let Some((original, target)) = *self.forced_dimensions.lock().unwrap() {
            if let Some(notice) = on_notice {
                notice(&format!(
                    "Image was too large and will be scaled down to {}",
                    target
                ));
            }
            return Ok(ResizeOutcome {
                seq,
                resized: true,
                file: file.clone(),
                original: Some(original),
                resized_to: Some(target),
            });
        }

        Ok(ResizeOutcome {
            seq,
            resized: false,
            file: file.clone(),
            original: None,
            resized_to: None,
        })
    }
}
