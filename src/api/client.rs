use super::BackendService;
use crate::models::{
    ApiErrorBody, AuthStatus, FaceAnalysis, SearchResults, TransformResult, UploadedImage,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    fn image_part(image: &UploadedImage) -> Result<Part> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.name.clone())
            .mime_str(&image.media_type)?;
        Ok(part)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP error: {}", status));
            tracing::error!("{} failed (status {}): {}", context, status, message);
            return Err(Error::Api(message));
        }

        // The backend can answer 200 with an explicit error field
        if let Ok(err) = serde_json::from_str::<ApiErrorBody>(&body) {
            tracing::error!("{} returned error: {}", context, err.error);
            return Err(Error::Api(err.error));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse {} response: {}\nBody: {}", context, e, body);
            Error::Api(format!("Failed to parse {} response: {}", context, e))
        })
    }
}

#[async_trait]
impl BackendService for BackendClient {
    async fn analyze_face(&self, image: &UploadedImage) -> Result<FaceAnalysis> {
        let form = Form::new().part("image", Self::image_part(image)?);

        let response = self
            .client
            .post(format!("{}/api/analyze-face", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response, "Face analysis").await
    }

    async fn transform_hairstyle(
        &self,
        image: &UploadedImage,
        hair_style: &str,
        color: &str,
    ) -> Result<TransformResult> {
        let form = Form::new()
            .part("image", Self::image_part(image)?)
            .text("hair_style", hair_style.to_string())
            .text("color", color.to_string());

        let response = self
            .client
            .post(format!("{}/api/transform-hairstyle", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response, "Hairstyle transform").await
    }

    async fn search_hairstyles(&self, query: &str) -> Result<SearchResults> {
        let response = self
            .client
            .get(format!("{}/api/search-hairstyles", self.base_url))
            .query(&[("q", query)])
            .send()
            .await?;

        Self::parse_response(response, "Hairstyle search").await
    }

    async fn auth_status(&self) -> Result<AuthStatus> {
        let response = self
            .client
            .get(format!("{}/api/auth/status", self.base_url))
            .send()
            .await?;

        Self::parse_response(response, "Auth status").await
    }
}
