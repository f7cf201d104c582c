//! Client-side image preparation
//!
//! Images are shrunk to fit the backend's per-endpoint resolution limits
//! before upload, preserving aspect ratio. Files that already fit (or are
//! not images at all) pass through untouched.

pub mod mock;
pub mod resizer;
pub mod sniff;

pub use mock::MockResizer;
pub use resizer::{ConstraintResizer, ResizePlan};

use crate::models::{Dimensions, UploadedImage};
use crate::Result;
use async_trait::async_trait;

/// Observer for human-readable progress notices (e.g. "image was scaled
/// down"). Purely informational; never affects the resize outcome.
pub type NoticeCallback = dyn Fn(&str) + Send + Sync;

/// Result of a resize request.
///
/// `seq` is a monotonically increasing per-resizer ticket. When a newer
/// request has been issued in the meantime, the caller should compare
/// `seq` against the resizer's latest ticket and discard stale outcomes.
#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    pub seq: u64,
    pub resized: bool,
    pub file: UploadedImage,
    pub original: Option<Dimensions>,
    pub resized_to: Option<Dimensions>,
}

#[async_trait]
pub trait ResizeService: Send + Sync {
    async fn resize(
        &self,
        file: &UploadedImage,
        max_width: u32,
        max_height: u32,
        on_notice: Option<&NoticeCallback>,
    ) -> Result<ResizeOutcome>;
}
