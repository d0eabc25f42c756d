//! Fitroom runtime: normalizes incoming requests and drives the budget-gated
//! try-on pipeline against the external service.

mod orchestrator;
mod resolve;
mod types;

pub use orchestrator::Orchestrator;
pub use resolve::{resolve, ResolvedRequest};
pub use types::{PipelineError, Stage, TryOnOutcome};
