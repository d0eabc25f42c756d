//! Budget ledger: cumulative per-user spend against a fixed shared limit.
//!
//! Admission is a single atomic reserve under the table's write lock;
//! reservations are committed after the paid work succeeds or released on
//! failure. The plain check/record pair from the original contract is kept
//! for reads, administration, and tests, and is not atomic as a pair.

mod ledger;
mod memory;

pub use ledger::{BudgetLedger, Reservation, UserSpending};
pub use memory::InMemoryLedger;
