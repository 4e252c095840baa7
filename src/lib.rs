//! Bank Ledger Library
//! # Overview
//!
//! Bank accounts whose balances are derived from an append-only ledger of
//! credits and debits, with overdraft-safe withdrawals under concurrency.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError)
//! - [`storage`] - Storage traits, in-memory stores and CSV snapshots
//! - [`core`] - Business logic components:
//!   - [`core::AccountStore`] - Account creation, lookup and search
//!   - [`core::TransactionLedger`] - Append-only credit/debit entries
//!   - [`core::BalanceCoordinator`] - Balances, deposits and withdrawals
//!   - [`core::AccountLocks`] - Bounded per-account critical sections
//!   - [`core::Bank`] - Wires the components over shared storage
//! - [`batch`] - CSV request files, run sequentially or concurrently
//! - [`io`] - CSV reading and output serialization
//! - [`cli`] - Argument parsing and command execution
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Balances
//!
//! No balance is stored. An account's balance is always the sum of its
//! credits minus the sum of its debits. A withdrawal reads that balance and
//! appends its debit inside the account's critical section, so concurrent
//! withdrawals can never drive a balance below zero.

pub mod batch;
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod storage;
pub mod types;

pub use core::{AccountStore, BalanceCoordinator, Bank, CoordinatorConfig, TransactionLedger};
pub use types::{
    Account, AccountBalance, AccountId, LedgerError, Transaction, TransactionId, TransactionKind,
};
