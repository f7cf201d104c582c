//! Backend API integration
//!
//! Typed access to the hairstyle backend's JSON endpoints: face analysis,
//! hairstyle transformation, catalog search, and auth status. Every
//! endpoint reports failures as an `{ "error": "..." }` body.

pub mod client;
pub mod mock;

pub use client::BackendClient;
pub use mock::MockBackendClient;

use crate::models::{AuthStatus, FaceAnalysis, SearchResults, TransformResult, UploadedImage};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BackendService: Send + Sync {
    async fn analyze_face(&self, image: &UploadedImage) -> Result<FaceAnalysis>;
    async fn transform_hairstyle(
        &self,
        image: &UploadedImage,
        hair_style: &str,
        color: &str,
    ) -> Result<TransformResult>;
    async fn search_hairstyles(&self, query: &str) -> Result<SearchResults>;
    async fn auth_status(&self) -> Result<AuthStatus>;
}
