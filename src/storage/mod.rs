//! Storage boundary
//!
//! The core never talks to a concrete store. It receives implementations of
//! the traits below at composition time, so tests and the CLI can swap the
//! in-memory backend or restore it from a snapshot.
//!
//! # Components
//!
//! - [`AccountStorage`] - account rows with generated ids and unique numbers
//! - [`LedgerStorage`] - append-only transaction rows
//! - [`Clock`] - source of append timestamps
//! - [`memory`] - `DashMap`-backed implementations
//! - [`snapshot`] - CSV persistence of a whole store

use crate::types::{
    Account, AccountFilter, AccountId, LedgerError, NewTransaction, Transaction, TransactionKind,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod memory;
pub mod snapshot;

pub use memory::{InMemoryAccountStorage, InMemoryLedgerStorage};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};

/// Persistent home of account records
pub trait AccountStorage: Send + Sync {
    /// Insert a new account with a freshly generated id
    ///
    /// The uniqueness check on `account_number` and the insert happen as one
    /// step; a duplicate fails with `DuplicateAccountNumber` and consumes no
    /// id.
    fn insert(&self, holder_name: &str, account_number: &str) -> Result<Account, LedgerError>;

    /// Look up an account by id
    fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Accounts matching `filter`, in insertion order
    fn scan(&self, filter: &AccountFilter) -> Result<Vec<Account>, LedgerError>;
}

/// Persistent home of ledger entries
pub trait LedgerStorage: Send + Sync {
    /// Append an entry, assigning its id in the same step
    fn insert(&self, entry: NewTransaction) -> Result<Transaction, LedgerError>;

    /// Total of all entries of `kind` for the account, zero when none exist
    fn sum_by_kind(&self, account_id: AccountId, kind: TransactionKind)
        -> Result<Decimal, LedgerError>;

    /// Most recent entry of one account
    fn last_entry(&self, account_id: AccountId) -> Result<Option<Transaction>, LedgerError>;

    /// Entries of one account, in append order
    fn entries(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError>;

    /// Every entry in the ledger, in id order
    fn all_entries(&self) -> Result<Vec<Transaction>, LedgerError>;
}

/// Source of append timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
