//! In-memory ledger. Process-lifetime state only: a restart resets every
//! user to zero spend.

use std::collections::{HashMap, HashSet};

use fitroom_core::BudgetCheck;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::ledger::{BudgetLedger, Reservation, UserSpending};

#[derive(Debug, Default, Clone, Copy)]
struct UserAccount {
    spent: Decimal,
    reserved: Decimal,
}

#[derive(Default)]
struct Table {
    accounts: HashMap<String, UserAccount>,
    open_reservations: HashSet<Uuid>,
}

/// Ledger over a single locked table, so reserve can check and hold in one
/// critical section.
pub struct InMemoryLedger {
    limit: Decimal,
    table: RwLock<Table>,
}

impl InMemoryLedger {
    pub fn new(limit: Decimal) -> Self {
        Self {
            limit,
            table: RwLock::new(Table::default()),
        }
    }

    fn snapshot(&self, account: UserAccount, amount: Decimal) -> BudgetCheck {
        let available = self.limit - account.spent - account.reserved;
        BudgetCheck {
            has_enough: available >= amount,
            spent: account.spent,
            remaining: available.max(Decimal::ZERO),
            limit: self.limit,
        }
    }
}

impl BudgetLedger for InMemoryLedger {
    fn limit(&self) -> Decimal {
        self.limit
    }

    fn check_budget(&self, user_id: &str, amount: Decimal) -> BudgetCheck {
        let table = self.table.read();
        let account = table.accounts.get(user_id).copied().unwrap_or_default();
        self.snapshot(account, amount)
    }

    fn reserve(&self, user_id: &str, amount: Decimal) -> Result<Reservation, BudgetCheck> {
        let mut table = self.table.write();
        let account = table.accounts.entry(user_id.to_string()).or_default();

        let available = self.limit - account.spent - account.reserved;
        if available < amount {
            let account = *account;
            debug!(user_id, %amount, "budget reservation refused");
            return Err(self.snapshot(account, amount));
        }

        account.reserved += amount;
        let reservation = Reservation {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            amount,
        };
        table.open_reservations.insert(reservation.id);
        debug!(user_id, %amount, reservation = %reservation.id, "budget reserved");
        Ok(reservation)
    }

    fn commit(&self, reservation: &Reservation) {
        let mut table = self.table.write();
        if !table.open_reservations.remove(&reservation.id) {
            return;
        }
        if let Some(account) = table.accounts.get_mut(&reservation.user_id) {
            account.reserved = (account.reserved - reservation.amount).max(Decimal::ZERO);
            account.spent += reservation.amount;
            debug!(
                user_id = %reservation.user_id,
                amount = %reservation.amount,
                spent = %account.spent,
                "budget reservation committed"
            );
        }
    }

    fn release(&self, reservation: &Reservation) {
        let mut table = self.table.write();
        if !table.open_reservations.remove(&reservation.id) {
            return;
        }
        if let Some(account) = table.accounts.get_mut(&reservation.user_id) {
            account.reserved = (account.reserved - reservation.amount).max(Decimal::ZERO);
            debug!(
                user_id = %reservation.user_id,
                amount = %reservation.amount,
                "budget reservation released"
            );
        }
    }

    fn record_spending(&self, user_id: &str, amount: Decimal) {
        let mut table = self.table.write();
        let account = table.accounts.entry(user_id.to_string()).or_default();
        account.spent += amount;
    }

    fn user_spending(&self, user_id: &str) -> Decimal {
        let table = self.table.read();
        table
            .accounts
            .get(user_id)
            .map(|a| a.spent)
            .unwrap_or(Decimal::ZERO)
    }

    fn all_spending(&self) -> Vec<UserSpending> {
        let table = self.table.read();
        table
            .accounts
            .iter()
            .map(|(user_id, account)| UserSpending {
                user_id: user_id.clone(),
                spent: account.spent,
                remaining: (self.limit - account.spent).max(Decimal::ZERO),
            })
            .collect()
    }

    fn reset(&self, user_id: &str) {
        self.table.write().accounts.remove(user_id);
    }

    fn reset_all(&self) {
        let mut table = self.table.write();
        table.accounts.clear();
        table.open_reservations.clear();
    }
}
