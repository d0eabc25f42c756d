//! Budget admin routes: spending reads and resets.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budget", get(all_spending))
        .route("/budget/reset", post(reset_all))
        .route("/budget/{user_id}", get(user_budget))
        .route("/budget/{user_id}/reset", post(reset_user))
}

/// GET /api/budget: spending for every account with activity.
async fn all_spending(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let users = state.ledger.all_spending();
    Json(json!({
        "users": users,
        "limit": state.ledger.limit(),
    }))
}

/// GET /api/budget/:user_id: one user snapshot.
async fn user_budget(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<serde_json::Value> {
    let check = state.ledger.check_budget(&user_id, Decimal::ZERO);
    Json(json!({
        "userId": user_id,
        "spent": check.spent,
        "remaining": check.remaining,
        "limit": check.limit,
    }))
}

/// POST /api/budget/:user_id/reset: clear one user entry.
async fn reset_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<serde_json::Value> {
    state.ledger.reset(&user_id);
    info!(%user_id, "budget reset");
    Json(json!({ "reset": true, "userId": user_id }))
}

/// POST /api/budget/reset: clear all entries.
async fn reset_all(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.ledger.reset_all();
    info!("all budgets reset");
    Json(json!({ "reset": true }))
}
