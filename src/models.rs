//! Data models and structures
//!
//! Defines the file-like upload object produced by the resizer, the JSON
//! shapes returned by the backend API, and environment configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// An image file as selected by the user: raw bytes plus the metadata a
/// browser would attach (name, declared media type, modification time).
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

impl UploadedImage {
    pub fn new(name: String, media_type: String, bytes: Vec<u8>) -> Self {
        Self {
            name,
            media_type,
            bytes,
            last_modified: Utc::now(),
        }
    }

    /// Load a file from disk, sniffing the media type from its content.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let bytes = std::fs::read(path)?;
        let media_type = crate::image::sniff::detect_media_type(&bytes).to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, media_type, bytes))
    }

    /// Whether the declared media type marks this file as an image.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub fn fits_within(&self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// Backend API response models

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HairstyleRecommendation {
    pub name: String,
    pub value: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceAnalysis {
    pub face_shape_kr: String,
    pub gender_kr: String,
    pub recommendations: Vec<HairstyleRecommendation>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    pub result_image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HairstyleEntry {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub similar_styles_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<HairstyleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    pub logged_in: bool,
    pub user: Option<AuthUser>,
}

/// Error body every backend endpoint uses on failure.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_base_url = std::env::var("BACKEND_BASE_URL")
            .unwrap_or_else(|_| "https://hairstyle-changer.onrender.com".to_string());

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("REQUEST_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => 120,
        };

        Ok(Self {
            backend_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_analysis_deserialization() {
        let json = r#"{
            "face_shape_kr": "계란형",
            "gender_kr": "여성",
            "recommendations": [
                {"name": "레이어드 컷", "value": "layered_cut", "image_url": "/static/images/layered.jpg"},
                {"name": "허쉬 컷", "value": "hush_cut", "image_url": null}
            ],
            "reason": "계란형 얼굴에는 대부분의 스타일이 잘 어울립니다."
        }"#;

        let analysis: FaceAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.face_shape_kr, "계란형");
        assert_eq!(analysis.recommendations.len(), 2);
        assert_eq!(analysis.recommendations[0].value, "layered_cut");
        assert!(analysis.recommendations[1].image_url.is_none());
    }

    #[test]
    fn test_search_results_with_missing_optional_fields() {
        let json = r#"{"results": [{"name": "단발"}]}"#;

        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.results.len(), 1);
        assert!(results.results[0].description.is_none());
        assert!(results.results[0].similar_styles_description.is_none());
    }

    #[test]
    fn test_auth_status_logged_out() {
        let json = r#"{"logged_in": false, "user": null}"#;

        let status: AuthStatus = serde_json::from_str(json).unwrap();
        assert!(!status.logged_in);
        assert!(status.user.is_none());
    }

    #[test]
    fn test_uploaded_image_is_image() {
        let file = UploadedImage::new(
            "photo.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![1, 2, 3],
        );
        assert!(file.is_image());
        assert_eq!(file.size(), 3);

        let text = UploadedImage::new(
            "notes.txt".to_string(),
            "text/plain".to_string(),
            vec![1, 2, 3],
        );
        assert!(!text.is_image());
    }

    #[test]
    fn test_dimensions_helpers() {
        let dims = Dimensions::new(4000, 2000);
        assert!((dims.aspect_ratio() - 2.0).abs() < f64::EPSILON);
        assert!(!dims.fits_within(2000, 2000));
        assert!(dims.fits_within(4000, 2000));
        assert_eq!(dims.to_string(), "4000x2000");
    }
}
