//! fal.ai HTTP client.
//!
//! Composition goes through the leffa virtual try-on model, generation
//! through flux; uploads use the storage initiate + PUT flow.

use async_trait::async_trait;
use fitroom_core::{Attachment, Error, GarmentType, Result, TryOnImage};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::service::TryOnService;

const COMPOSE_MODEL: &str = "fal-ai/leffa/virtual-tryon";
const GENERATE_MODEL: &str = "fal-ai/flux/schnell";

/// Client for the fal.ai REST surface.
pub struct FalClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct InitiateUploadResponse {
    upload_url: String,
    file_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ComposeResponse {
    image: ComposedImage,
    #[serde(default)]
    seed: u64,
    #[serde(default)]
    has_nsfw_concepts: bool,
}

#[derive(Debug, Deserialize)]
struct ComposedImage {
    url: String,
    width: u32,
    height: u32,
}

impl FalClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "calling fal.ai");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "fal.ai returned {} for {}: {}",
                status, path, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::ExternalService(format!("invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl TryOnService for FalClient {
    async fn upload_image(&self, attachment: &Attachment) -> Result<String> {
        let content_type = attachment
            .content_type
            .clone()
            .unwrap_or_else(|| "image/jpeg".to_string());
        let file_name = attachment
            .file_name
            .clone()
            .unwrap_or_else(|| "image.jpg".to_string());

        let initiated: InitiateUploadResponse = self
            .post(
                "storage/upload/initiate",
                json!({
                    "file_name": file_name,
                    "content_type": &content_type,
                }),
            )
            .await?;

        let response = self
            .client
            .put(&initiated.upload_url)
            .header("Content-Type", content_type)
            .body(attachment.bytes.clone())
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ExternalService(format!(
                "upload returned {}",
                response.status()
            )));
        }

        debug!(url = %initiated.file_url, bytes = attachment.bytes.len(), "image uploaded");
        Ok(initiated.file_url)
    }

    async fn generate_garment(&self, description: &str) -> Result<String> {
        let generated: GenerateResponse = self
            .post(GENERATE_MODEL, json!({ "prompt": description }))
            .await?;

        let image = generated
            .images
            .into_iter()
            .next()
            .ok_or_else(|| Error::ExternalService("generation returned no images".into()))?;

        debug!(url = %image.url, "garment generated");
        Ok(image.url)
    }

    async fn compose(
        &self,
        human_url: &str,
        garment_url: &str,
        garment_type: GarmentType,
    ) -> Result<TryOnImage> {
        let composed: ComposeResponse = self
            .post(
                COMPOSE_MODEL,
                json!({
                    "human_image_url": human_url,
                    "garment_image_url": garment_url,
                    "garment_type": garment_type.as_str(),
                }),
            )
            .await?;

        Ok(TryOnImage {
            image_url: composed.image.url,
            width: composed.image.width,
            height: composed.image.height,
            seed: composed.seed,
            has_nsfw_concepts: composed.has_nsfw_concepts,
        })
    }
}
