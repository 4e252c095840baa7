//! Composition root
//!
//! # Architecture
//!
//! ```text
//! Bank
//!     ├── AccountStore         (Arc<dyn AccountStorage>)
//!     └── BalanceCoordinator
//!         ├── TransactionLedger (Arc<dyn LedgerStorage>)
//!         ├── Arc<dyn Clock>
//!         └── AccountLocks
//! ```
//!
//! Storage and clock are handed in explicitly; nothing in the core reaches
//! for a global handle.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::{AccountStore, BalanceCoordinator, CoordinatorConfig, TransactionLedger};
use crate::storage::{
    AccountStorage, Clock, InMemoryAccountStorage, InMemoryLedgerStorage, LedgerStorage,
    Snapshot, SystemClock,
};
use crate::types::{Account, AccountBalance, AccountId, LedgerError, Transaction};

/// The assembled ledger service
///
/// Cheap to clone; clones share the same storage and locks.
#[derive(Clone)]
pub struct Bank {
    accounts: AccountStore,
    coordinator: BalanceCoordinator,
    account_storage: Arc<dyn AccountStorage>,
    ledger_storage: Arc<dyn LedgerStorage>,
}

impl Bank {
    pub fn new(
        account_storage: Arc<dyn AccountStorage>,
        ledger_storage: Arc<dyn LedgerStorage>,
        clock: Arc<dyn Clock>,
        config: CoordinatorConfig,
    ) -> Self {
        let accounts = AccountStore::new(Arc::clone(&account_storage));
        let ledger = TransactionLedger::new(accounts.clone(), Arc::clone(&ledger_storage));
        let coordinator = BalanceCoordinator::new(accounts.clone(), ledger, clock, config);

        Self {
            accounts,
            coordinator,
            account_storage,
            ledger_storage,
        }
    }

    /// Empty in-memory bank on the system clock
    pub fn in_memory(config: CoordinatorConfig) -> Self {
        Self::new(
            Arc::new(InMemoryAccountStorage::new()),
            Arc::new(InMemoryLedgerStorage::new()),
            Arc::new(SystemClock),
            config,
        )
    }

    /// Bank over stores restored from a snapshot
    pub fn from_snapshot(snapshot: Snapshot, config: CoordinatorConfig) -> Self {
        Self::new(snapshot.accounts, snapshot.ledger, Arc::new(SystemClock), config)
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn coordinator(&self) -> &BalanceCoordinator {
        &self.coordinator
    }

    pub fn account_storage(&self) -> &dyn AccountStorage {
        self.account_storage.as_ref()
    }

    pub fn ledger_storage(&self) -> &dyn LedgerStorage {
        self.ledger_storage.as_ref()
    }

    pub fn create_account(
        &self,
        holder_name: &str,
        account_number: &str,
    ) -> Result<Account, LedgerError> {
        self.accounts.create_account(holder_name, account_number)
    }

    pub fn find_accounts(
        &self,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Vec<Account>, LedgerError> {
        self.accounts.find_accounts(name, number)
    }

    pub fn deposit(&self, account_id: AccountId, amount: Decimal) -> Result<Transaction, LedgerError> {
        self.coordinator.deposit(account_id, amount)
    }

    pub fn withdraw(&self, account_id: AccountId, amount: Decimal) -> Result<Transaction, LedgerError> {
        self.coordinator.withdraw(account_id, amount)
    }

    pub fn get_balance(&self, account_id: AccountId) -> Result<Decimal, LedgerError> {
        self.coordinator.get_balance(account_id)
    }

    pub fn statement(&self, account_id: AccountId) -> Result<AccountBalance, LedgerError> {
        self.coordinator.statement(account_id)
    }

    pub fn history(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.coordinator.history(account_id)
    }
}
