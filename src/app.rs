//! Application flows tying image preparation to backend calls.
//!
//! Each upload flow mirrors what the backend enforces: images are shrunk
//! to the endpoint's resolution limit first, then checked against its
//! size and format rules before any bytes leave the machine.

use crate::api::{BackendClient, BackendService};
use crate::image::{ConstraintResizer, NoticeCallback, ResizeService};
use crate::models::{AuthStatus, Config, FaceAnalysis, SearchResults, TransformResult, UploadedImage};
use crate::{Error, Result};
use tracing::{info, warn};

// Face analysis accepts larger images than the transform endpoint.
const ANALYZE_MAX_WIDTH: u32 = 2000;
const ANALYZE_MAX_HEIGHT: u32 = 2000;
const ANALYZE_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const ANALYZE_ALLOWED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/bmp"];

const TRANSFORM_MAX_WIDTH: u32 = 1500;
const TRANSFORM_MAX_HEIGHT: u32 = 1500;
const TRANSFORM_MAX_UPLOAD_BYTES: usize = 3 * 1024 * 1024;
const TRANSFORM_ALLOWED_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Coordinates image preparation and backend calls for the user-facing flows.
pub struct App {
    resizer: Box<dyn ResizeService>,
    backend: Box<dyn BackendService>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub resizer: Box<dyn ResizeService>,
    pub backend: Box<dyn BackendService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            resizer: services.resizer,
            backend: services.backend,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        info!("Using backend at {}", config.backend_base_url);

        Ok(Self::with_services(AppServices {
            resizer: Box::new(ConstraintResizer::new()),
            backend: Box::new(BackendClient::new(
                config.backend_base_url,
                config.request_timeout,
            )),
        }))
    }

    fn check_upload(
        upload: &UploadedImage,
        max_bytes: usize,
        allowed_types: &[&str],
    ) -> Result<()> {
        if upload.size() > max_bytes {
            return Err(Error::InvalidInput(format!(
                "Image is {:.2} MB even after automatic resizing; the limit is {} MB",
                upload.size() as f64 / 1024.0 / 1024.0,
                max_bytes / 1024 / 1024
            )));
        }
        if !allowed_types.contains(&upload.media_type.as_str()) {
            return Err(Error::InvalidInput(format!(
                "Unsupported file type {}; allowed: {}",
                upload.media_type,
                allowed_types.join(", ")
            )));
        }
        Ok(())
    }

    /// Analyze a face photo and return hairstyle recommendations.
    pub async fn analyze(
        &self,
        file: &UploadedImage,
        on_notice: Option<&NoticeCallback>,
    ) -> Result<FaceAnalysis> {
        let outcome = self
            .resizer
            .resize(file, ANALYZE_MAX_WIDTH, ANALYZE_MAX_HEIGHT, on_notice)
            .await?;

        Self::check_upload(&outcome.file, ANALYZE_MAX_UPLOAD_BYTES, &ANALYZE_ALLOWED_TYPES)?;

        info!(
            "Uploading {} ({:.2} MB) for face analysis",
            outcome.file.name,
            outcome.file.size() as f64 / 1024.0 / 1024.0
        );
        self.backend.analyze_face(&outcome.file).await
    }

    /// Apply a hairstyle (and optional color) to a face photo.
    pub async fn transform(
        &self,
        file: &UploadedImage,
        hair_style: &str,
        color: &str,
        on_notice: Option<&NoticeCallback>,
    ) -> Result<TransformResult> {
        if hair_style.is_empty() {
            return Err(Error::InvalidInput("No hairstyle selected".to_string()));
        }

        let outcome = self
            .resizer
            .resize(file, TRANSFORM_MAX_WIDTH, TRANSFORM_MAX_HEIGHT, on_notice)
            .await?;

        Self::check_upload(
            &outcome.file,
            TRANSFORM_MAX_UPLOAD_BYTES,
            &TRANSFORM_ALLOWED_TYPES,
        )?;

        info!(
            "Uploading {} ({:.2} MB) for hairstyle transform (style: {})",
            outcome.file.name,
            outcome.file.size() as f64 / 1024.0 / 1024.0,
            hair_style
        );
        self.backend
            .transform_hairstyle(&outcome.file, hair_style, color)
            .await
    }

    /// Search the hairstyle catalog. An empty query returns everything.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        self.backend.search_hairstyles(query).await
    }

    /// Check login status, degrading to logged-out when the backend is
    /// unreachable (the UI shows a login button either way).
    pub async fn auth_status(&self) -> AuthStatus {
        match self.backend.auth_status().await {
            Ok(status) => status,
            Err(e) => {
                warn!("Auth status check failed: {}", e);
                AuthStatus {
                    logged_in: false,
                    user: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackendClient;
    use crate::image::MockResizer;
    use crate::models::{Dimensions, HairstyleRecommendation};

    fn test_analysis() -> FaceAnalysis {
        FaceAnalysis {
            face_shape_kr: "계란형".to_string(),
            gender_kr: "여성".to_string(),
            recommendations: vec![HairstyleRecommendation {
                name: "레이어드 컷".to_string(),
                value: "layered_cut".to_string(),
                image_url: None,
            }],
            reason: "대부분의 스타일이 잘 어울립니다.".to_string(),
        }
    }

    fn jpeg_file(size: usize) -> UploadedImage {
        UploadedImage::new("photo.jpg".to_string(), "image/jpeg".to_string(), vec![0; size])
    }

    fn build_app(resizer: MockResizer, backend: MockBackendClient) -> App {
        App::with_services(AppServices {
            resizer: Box::new(resizer),
            backend: Box::new(backend),
        })
    }

    #[tokio::test]
    async fn test_analyze_flow_uploads_prepared_file() {
        let backend = MockBackendClient::new().with_analysis(test_analysis());
        let backend_probe = backend.clone();

        let resizer = MockResizer::new()
            .with_resize(Dimensions::new(4000, 2000), Dimensions::new(2000, 1000));
        let resizer_probe = resizer.clone();
        let app = build_app(resizer, backend);

        let analysis = app.analyze(&jpeg_file(1024), None).await.unwrap();
        assert_eq!(analysis.face_shape_kr, "계란형");

        assert_eq!(resizer_probe.get_resize_count(), 1);
        let uploads = backend_probe.recorded_uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].name, "photo.jpg");
        assert_eq!(uploads[0].media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_analyze_rejects_oversized_upload() {
        let backend = MockBackendClient::new().with_analysis(test_analysis());
        let app = build_app(MockResizer::new(), backend);

        // Passthrough resizer leaves the 6 MB file as-is
        let err = app
            .analyze(&jpeg_file(6 * 1024 * 1024), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_analyze_rejects_unsupported_type() {
        let backend = MockBackendClient::new().with_analysis(test_analysis());
        let app = build_app(MockResizer::new(), backend);

        let file = UploadedImage::new(
            "anim.gif".to_string(),
            "image/gif".to_string(),
            vec![0; 100],
        );
        let err = app.analyze(&file, None).await.unwrap_err();

        match err {
            Error::InvalidInput(message) => assert!(message.contains("image/gif")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transform_rejects_file_over_3mb() {
        let backend = MockBackendClient::new().with_transform(TransformResult {
            result_image_url: "https://example.com/r.jpg".to_string(),
        });
        let app = build_app(MockResizer::new(), backend);

        let err = app
            .transform(&jpeg_file(4 * 1024 * 1024), "buzz_cut", "", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_transform_accepts_file_under_3mb() {
        let backend = MockBackendClient::new().with_transform(TransformResult {
            result_image_url: "https://example.com/r.jpg".to_string(),
        });
        let app = build_app(MockResizer::new(), backend);

        let result = app
            .transform(&jpeg_file(1024 * 1024), "buzz_cut", "brown", None)
            .await
            .unwrap();
        assert_eq!(result.result_image_url, "https://example.com/r.jpg");
    }

    #[tokio::test]
    async fn test_transform_requires_hairstyle() {
        let app = build_app(MockResizer::new(), MockBackendClient::new());

        let err = app
            .transform(&jpeg_file(1024), "", "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_transform_rejects_bmp() {
        // BMP is acceptable for analysis but not for transformation
        let backend = MockBackendClient::new().with_transform(TransformResult {
            result_image_url: "https://example.com/r.jpg".to_string(),
        });
        let app = build_app(MockResizer::new(), backend);

        let file = UploadedImage::new(
            "photo.bmp".to_string(),
            "image/bmp".to_string(),
            vec![0; 100],
        );
        let err = app
            .transform(&file, "buzz_cut", "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_resize_failure_aborts_upload() {
        let backend = MockBackendClient::new().with_analysis(test_analysis());
        let app = App::with_services(AppServices {
            resizer: Box::new(MockResizer::new().with_failure(true)),
            backend: Box::new(backend),
        });

        let err = app.analyze(&jpeg_file(1024), None).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_auth_status_degrades_to_logged_out() {
        let app = build_app(MockResizer::new(), MockBackendClient::new().with_failure(true));

        let status = app.auth_status().await;
        assert!(!status.logged_in);
        assert!(status.user.is_none());
    }

    #[tokio::test]
    async fn test_search_passes_through() {
        let backend = MockBackendClient::new().with_search_results(SearchResults {
            results: Vec::new(),
        });
        let app = build_app(MockResizer::new(), backend);

        let results = app.search("").await.unwrap();
        assert!(results.results.is_empty());
    }
}
