use super::BackendService;
use crate::models::{
    AuthStatus, FaceAnalysis, SearchResults, TransformResult, UploadedImage,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Metadata of a file the mock saw uploaded, for asserting that flows
/// upload the prepared file rather than the user's original.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub name: String,
    pub media_type: String,
    pub size: usize,
}

#[derive(Clone)]
pub struct MockBackendClient {
    analysis: Arc<Mutex<Option<FaceAnalysis>>>,
    transform: Arc<Mutex<Option<TransformResult>>>,
    search: Arc<Mutex<Option<SearchResults>>>,
    auth: Arc<Mutex<Option<AuthStatus>>>,
    should_fail: Arc<Mutex<bool>>,
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self {
            analysis: Arc::new(Mutex::new(None)),
            transform: Arc::new(Mutex::new(None)),
            search: Arc::new(Mutex::new(None)),
            auth: Arc::new(Mutex::new(None)),
            should_fail: Arc::new(Mutex::new(false)),
            uploads: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_analysis(self, analysis: FaceAnalysis) -> Self {
        *self.analysis.lock().unwrap() = Some(analysis);
        self
    }

    pub fn with_transform(self, transform: TransformResult) -> Self {
        *self.transform.lock().unwrap() = Some(transform);
        self
    }

    pub fn with_search_results(self, results: SearchResults) -> Self {
        *self.search.lock().unwrap() = Some(results);
        self
    }

    pub fn with_auth_status(self, status: AuthStatus) -> Self {
        *self.auth.lock().unwrap() = Some(status);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    fn record_call(&self) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(Error::Api("Mock backend failure".to_string()));
        }
        *self.call_count.lock().unwrap() += 1;
        Ok(())
    }

    fn record_upload(&self, image: &UploadedImage) {
        self.uploads.lock().unwrap().push(RecordedUpload {
            name: image.name.clone(),
            media_type: image.media_type.clone(),
            size: image.size(),
        });
    }
}

impl Default for MockBackendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendService for MockBackendClient {
    async fn analyze_face(&self, image: &UploadedImage) -> Result<FaceAnalysis> {
        self.record_call()?;
        self.record_upload(image);
        self.analysis
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Api("No analysis response configured".to_string()))
    }

    async fn transform_hairstyle(
        &self,
        image: &UploadedImage,
        _hair_style: &str,
        _color: &str,
    ) -> Result<TransformResult> {
        self.record_call()?;
        self.record_upload(image);
        self.transform
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Api("No transform response configured".to_string()))
    }

    async fn search_hairstyles(&self, _query: &str) -> Result<SearchResults> {
        self.record_call()?;
        self.search
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Api("No search response configured".to_string()))
    }

    async fn auth_status(&self) -> Result<AuthStatus> {
        self.record_call()?;
        self.auth
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Api("No auth status configured".to_string()))
    }
}
