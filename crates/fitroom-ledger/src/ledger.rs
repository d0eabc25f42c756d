//! Ledger trait and reservation types.

use fitroom_core::BudgetCheck;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// A held budget amount for one in-flight request.
///
/// Obtained from [`BudgetLedger::reserve`]; must be settled with exactly one
/// of [`BudgetLedger::commit`] or [`BudgetLedger::release`]. Settling twice
/// is a no-op.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: String,
    pub amount: Decimal,
}

/// Per-user spending row for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct UserSpending {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub spent: Decimal,
    pub remaining: Decimal,
}

/// Accounting backend for per-user spend against a fixed shared limit.
///
/// Implementations must be safe to share across concurrently handled
/// requests; `reserve` is the only admission path the pipeline uses.
pub trait BudgetLedger: Send + Sync {
    /// The fixed limit shared by all accounts.
    fn limit(&self) -> Decimal;

    /// Pure read: whether `amount` still fits, plus the current snapshot.
    /// `remaining` is floored at zero for display even if spend has been
    /// pushed past the limit.
    fn check_budget(&self, user_id: &str, amount: Decimal) -> BudgetCheck;

    /// Atomically check capacity and hold `amount` for this request.
    /// Refusal returns the snapshot that justified it.
    fn reserve(&self, user_id: &str, amount: Decimal) -> Result<Reservation, BudgetCheck>;

    /// Convert a held reservation into recorded spend.
    fn commit(&self, reservation: &Reservation);

    /// Drop a held reservation without charging.
    fn release(&self, reservation: &Reservation);

    /// Add `amount` to a user's accumulated spend, creating the account on
    /// first use. Not an admission path: no capacity check is performed.
    fn record_spending(&self, user_id: &str, amount: Decimal);

    /// Total recorded spend for a user (zero for unknown users).
    fn user_spending(&self, user_id: &str) -> Decimal;

    /// All accounts with recorded activity.
    fn all_spending(&self) -> Vec<UserSpending>;

    /// Clear one user's entry.
    fn reset(&self, user_id: &str);

    /// Clear all entries.
    fn reset_all(&self);
}
