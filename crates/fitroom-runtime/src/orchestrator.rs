//! Orchestrator: sequences resolution, budget admission, the external calls,
//! and spend recording.

use std::sync::Arc;

use fitroom_core::config::Pricing;
use fitroom_core::types::{ImageSource, TryOnImage, TryOnInput, TryOnRequest};
use fitroom_core::Error;
use fitroom_fal::TryOnService;
use fitroom_ledger::BudgetLedger;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::resolve::{resolve, ResolvedRequest};
use crate::types::{PipelineError, Stage, TryOnOutcome};

/// Drives one try-on request through the pipeline.
///
/// The budget is held atomically before any external call, committed only
/// when the whole pipeline succeeds, and released otherwise. External calls
/// run strictly sequentially within a request.
pub struct Orchestrator {
    ledger: Arc<dyn BudgetLedger>,
    service: Arc<dyn TryOnService>,
    pricing: Pricing,
}

impl Orchestrator {
    pub fn new(
        ledger: Arc<dyn BudgetLedger>,
        service: Arc<dyn TryOnService>,
        pricing: Pricing,
    ) -> Self {
        Self {
            ledger,
            service,
            pricing,
        }
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    /// Run the full pipeline for one request.
    pub async fn process(
        &self,
        user_id: &str,
        input: TryOnInput,
    ) -> Result<TryOnOutcome, PipelineError> {
        debug!(user_id, stage = %Stage::Validating, "try-on request received");
        let ResolvedRequest { request, estimate } = resolve(input, &self.pricing)?;

        debug!(
            user_id,
            stage = %Stage::BudgetCheck,
            cost = %estimate.total,
            needs_generation = estimate.needs_generation,
            "admitting against budget"
        );
        let reservation = self
            .ledger
            .reserve(user_id, estimate.total)
            .map_err(|budget| {
                info!(
                    user_id,
                    cost = %estimate.total,
                    spent = %budget.spent,
                    remaining = %budget.remaining,
                    "budget limit reached"
                );
                PipelineError::BudgetExceeded {
                    cost: estimate.total,
                    budget,
                }
            })?;

        match self.run_external(&request).await {
            Ok((result, generated_garment)) => {
                debug!(user_id, stage = %Stage::RecordingSpend, cost = %estimate.total, "recording spend");
                self.ledger.commit(&reservation);
                let budget = self.ledger.check_budget(user_id, Decimal::ZERO);
                info!(
                    user_id,
                    cost = %estimate.total,
                    spent = %budget.spent,
                    "try-on completed"
                );
                Ok(TryOnOutcome {
                    result,
                    generated_garment,
                    cost: estimate.total,
                    budget,
                    garment_type: request.garment_type,
                    used_description: estimate.needs_generation,
                })
            }
            Err(err) => {
                // Partial external progress is not rolled back and not
                // charged; only the reservation is freed.
                self.ledger.release(&reservation);
                warn!(user_id, error = %err, "try-on pipeline failed");
                Err(err)
            }
        }
    }

    /// The external-call sequence: uploads, optional generation, composition.
    async fn run_external(
        &self,
        request: &TryOnRequest,
    ) -> Result<(TryOnImage, Option<String>), PipelineError> {
        let human_url = self.source_url(&request.human).await?;

        let (garment_url, generated_garment) = match &request.garment {
            Some(source) => (self.source_url(source).await?, None),
            None => {
                let description = request.description.as_deref().unwrap_or_default();
                debug!(stage = %Stage::Generating, "generating garment from description");
                let url = self
                    .service
                    .generate_garment(description)
                    .await
                    .map_err(|e| external(Stage::Generating, e))?;
                (url.clone(), Some(url))
            }
        };

        debug!(stage = %Stage::Composing, garment_type = %request.garment_type, "composing try-on");
        let result = self
            .service
            .compose(&human_url, &garment_url, request.garment_type)
            .await
            .map_err(|e| external(Stage::Composing, e))?;

        Ok((result, generated_garment))
    }

    async fn source_url(&self, source: &ImageSource) -> Result<String, PipelineError> {
        match source {
            ImageSource::Url(url) => Ok(url.clone()),
            ImageSource::Binary(attachment) => {
                debug!(stage = %Stage::Uploading, bytes = attachment.bytes.len(), "uploading image");
                self.service
                    .upload_image(attachment)
                    .await
                    .map_err(|e| external(Stage::Uploading, e))
            }
        }
    }
}

fn external(stage: Stage, err: Error) -> PipelineError {
    let message = match err {
        Error::ExternalService(message) => message,
        other => other.to_string(),
    };
    PipelineError::External { stage, message }
}
