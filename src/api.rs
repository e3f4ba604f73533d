use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logs::{DeviceLogGroup, LogsSnapshot};

const BASE_URL: &str = "https://ad-display-backend.onrender.com";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
}

/// One scheduled image as the backend accepts it. Built per staged image at
/// submit time and dropped once the request completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub image_name: String,
    pub image_url: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: u32,
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub image_name: String,
    pub image_url: String,
    #[serde(default)]
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    pub id: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudinaryImage {
    pub public_id: String,
    #[serde(default)]
    pub url: String,
}

/// Backend surface the submit worker and log poller run against.
pub trait AdsBackend: Send + Sync + 'static {
    fn create_image(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn submit_ads(
        &self,
        ads: &[SubmissionPayload],
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn fetch_logs(&self) -> impl Future<Output = Result<Vec<DeviceLogGroup>, ApiError>> + Send;
}

/// Backend surface for the hosted image assets behind the manage screen.
pub trait AssetBackend: Send + Sync + 'static {
    fn fetch_assets(&self) -> impl Future<Output = Result<Vec<CloudinaryImage>, ApiError>> + Send;
    fn delete_asset(&self, public_id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;
    fn delete_assets(
        &self,
        public_ids: &[String],
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

pub struct AdDisplayApi {
    client: Client,
    base_url: String,
}

impl AdDisplayApi {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_images(&self) -> Result<Vec<ImageRecord>, ApiError> {
        #[derive(Deserialize)]
        struct ImagesResponse {
            success: bool,
            #[serde(default)]
            data: Vec<ImageRecord>,
            #[serde(default)]
            error: Option<String>,
        }

        let resp = self
            .client
            .get(format!("{}/api/images", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let body: ImagesResponse = resp.json().await?;
        if !body.success {
            return Err(ApiError::Rejected(
                body.error
                    .unwrap_or_else(|| "Failed to fetch images.".to_string()),
            ));
        }
        Ok(body.data)
    }

    pub async fn delete_image(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(format!("{}/api/images/{}", self.base_url, id))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }

    pub async fn fetch_ads(&self) -> Result<Vec<AdRecord>, ApiError> {
        #[derive(Deserialize)]
        struct AdsResponse {
            #[serde(default)]
            ads: Vec<AdRecord>,
        }

        let resp = self
            .client
            .get(format!("{}/api/ads", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let body: AdsResponse = resp.json().await?;
        Ok(body.ads)
    }

    pub async fn delete_ad(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(format!("{}/api/ads/{}", self.base_url, id))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }
}

impl Default for AdDisplayApi {
    fn default() -> Self {
        Self::new()
    }
}

impl AdsBackend for AdDisplayApi {
    async fn create_image(&self, payload: &SubmissionPayload) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(format!("{}/api/images", self.base_url))
            .json(payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }

    async fn submit_ads(&self, ads: &[SubmissionPayload]) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct AdsBody<'a> {
            ads: &'a [SubmissionPayload],
        }

        let resp = self
            .client
            .post(format!("{}/api/ads/add", self.base_url))
            .json(&AdsBody { ads })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }

    async fn fetch_logs(&self) -> Result<Vec<DeviceLogGroup>, ApiError> {
        let resp = self
            .client
            .get(format!("{}/api/logs", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let snapshot: LogsSnapshot = resp.json().await?;
        Ok(snapshot.into_groups())
    }
}

impl AssetBackend for AdDisplayApi {
    async fn fetch_assets(&self) -> Result<Vec<CloudinaryImage>, ApiError> {
        #[derive(Deserialize)]
        struct AssetsResponse {
            success: bool,
            #[serde(default)]
            data: Vec<CloudinaryImage>,
            #[serde(default)]
            error: Option<String>,
        }

        let resp = self
            .client
            .get(format!("{}/api/cloudinary-images", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let body: AssetsResponse = resp.json().await?;
        if !body.success {
            return Err(ApiError::Rejected(
                body.error
                    .unwrap_or_else(|| "Failed to fetch images.".to_string()),
            ));
        }
        Ok(body.data)
    }

    async fn delete_asset(&self, public_id: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(format!(
                "{}/api/cloudinary-images/{}",
                self.base_url, public_id
            ))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }

    async fn delete_assets(&self, public_ids: &[String]) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct BulkDelete<'a> {
            public_ids: &'a [String],
        }

        let resp = self
            .client
            .post(format!("{}/api/cloudinary-images/delete", self.base_url))
            .json(&BulkDelete { public_ids })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }
}

/// Pull the backend's reported error text out of a non-2xx response. The
/// text may arrive as a JSON `{error}` body or as plain text.
async fn rejection(resp: reqwest::Response) -> ApiError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        if !parsed.error.is_empty() {
            return ApiError::Rejected(parsed.error);
        }
    }

    let text = body.trim();
    if text.is_empty() {
        ApiError::Rejected(format!("request failed ({})", status))
    } else {
        ApiError::Rejected(text.to_string())
    }
}
