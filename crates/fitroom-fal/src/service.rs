//! Capability set the pipeline depends on.

use async_trait::async_trait;
use fitroom_core::{Attachment, GarmentType, Result, TryOnImage};

/// Operations the orchestrator needs from the external provider.
///
/// Failures are reported uniformly as `Error::ExternalService`; provider
/// error codes are not interpreted here. Calls carry no timeout of their
/// own, so a hung provider blocks the request.
#[async_trait]
pub trait TryOnService: Send + Sync {
    /// Upload raw image bytes, returning a hosted URL.
    async fn upload_image(&self, attachment: &Attachment) -> Result<String>;

    /// Generate a garment image from a text description, returning its URL.
    async fn generate_garment(&self, description: &str) -> Result<String>;

    /// Compose the human and garment images into a rendered try-on result.
    async fn compose(
        &self,
        human_url: &str,
        garment_url: &str,
        garment_type: GarmentType,
    ) -> Result<TryOnImage>;
}
