//! Shared application state.

use std::sync::Arc;

use fitroom_core::FitroomConfig;
use fitroom_fal::{FalClient, TryOnService};
use fitroom_ledger::{BudgetLedger, InMemoryLedger};
use fitroom_runtime::Orchestrator;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: FitroomConfig,
    pub ledger: Arc<dyn BudgetLedger>,
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: FitroomConfig) -> Self {
        let ledger: Arc<dyn BudgetLedger> = Arc::new(InMemoryLedger::new(config.user_limit));
        let service: Arc<dyn TryOnService> = Arc::new(FalClient::new(
            config.fal_base_url.clone(),
            config.fal_key.clone(),
        ));
        let orchestrator = Orchestrator::new(ledger.clone(), service, config.pricing);

        Self {
            config,
            ledger,
            orchestrator,
        }
    }
}
