//! Core business logic module
//!
//! This module contains the ledger components, leaves first:
//! - `account_store` - Account identity and uniqueness
//! - `ledger` - Append-only credit/debit entries
//! - `coordinator` - Derived balances and the overdraft-safe withdrawal
//! - `account_locks` - Per-account critical sections used by the coordinator
//! - `bank` - Composition root wiring the components over injected storage

pub mod account_locks;
pub mod account_store;
pub mod bank;
pub mod coordinator;
pub mod ledger;

pub use account_locks::AccountLocks;
pub use account_store::AccountStore;
pub use bank::Bank;
pub use coordinator::{BalanceCoordinator, CoordinatorConfig};
pub use ledger::TransactionLedger;
