//! Pipeline types and failure taxonomy.

use fitroom_core::{BudgetCheck, GarmentType, TryOnImage};
use rust_decimal::Decimal;
use thiserror::Error;

/// Pipeline stage, used in tracing events and external-failure errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    BudgetCheck,
    Uploading,
    Generating,
    Composing,
    RecordingSpend,
    Responding,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Validating => "validation",
            Stage::BudgetCheck => "budget check",
            Stage::Uploading => "image upload",
            Stage::Generating => "garment generation",
            Stage::Composing => "composition",
            Stage::RecordingSpend => "spend recording",
            Stage::Responding => "response",
        };
        f.write_str(name)
    }
}

/// Terminal pipeline failures.
///
/// Validation never touches the ledger or the external service; a budget
/// refusal carries the snapshot that justified it; external failures name
/// the stage that failed and record no spend.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("User budget limit reached")]
    BudgetExceeded { cost: Decimal, budget: BudgetCheck },

    #[error("{stage} failed: {message}")]
    External { stage: Stage, message: String },
}

/// Result of a fully successful pipeline run.
#[derive(Debug, Clone)]
pub struct TryOnOutcome {
    pub result: TryOnImage,
    /// URL of the generated garment image, when the generation step ran.
    pub generated_garment: Option<String>,
    /// The amount charged: always the pre-computed estimate.
    pub cost: Decimal,
    /// Ledger snapshot taken after the spend was recorded.
    pub budget: BudgetCheck,
    pub garment_type: GarmentType,
    pub used_description: bool,
}
