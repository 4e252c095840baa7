//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account records, search filters and balance reports
//! - `transaction`: Ledger entries, entry kinds and identifiers
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountBalance, AccountFilter, AccountId};
pub use error::LedgerError;
pub use transaction::{parse_amount, NewTransaction, Transaction, TransactionId, TransactionKind};
