//! Thread-safe in-memory storage
//!
//! Both stores use `DashMap` (a concurrent HashMap) so that work on
//! different accounts proceeds in parallel while writes touching the same
//! key are serialized by the map's shard locks.
//!
//! # Identifier assignment
//!
//! Ids come from an `AtomicU64` sequence and are drawn while the shard lock
//! for the row's key is held, so an id is never observable without the row
//! it belongs to.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rust_decimal::Decimal;

use super::{AccountStorage, LedgerStorage};
use crate::types::{
    Account, AccountFilter, AccountId, LedgerError, NewTransaction, Transaction, TransactionKind,
};

/// Account rows keyed by id, with a unique index on account number
#[derive(Debug, Default)]
pub struct InMemoryAccountStorage {
    accounts: DashMap<AccountId, Account>,

    /// Unique index: account number to id
    numbers: DashMap<String, AccountId>,

    /// Last id handed out
    last_id: AtomicU64,
}

impl InMemoryAccountStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-insert an account that already has an id (snapshot restore)
    ///
    /// The id sequence is moved past the restored id.
    pub fn restore(&self, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::internal(format!(
                "snapshot contains account id {} twice",
                account.id
            )));
        }

        let mut fresh = false;
        self.numbers
            .entry(account.account_number.clone())
            .or_insert_with(|| {
                fresh = true;
                account.id
            });
        if !fresh {
            return Err(LedgerError::duplicate_account_number(
                &account.account_number,
            ));
        }

        self.last_id.fetch_max(account.id, Ordering::SeqCst);
        self.accounts.insert(account.id, account);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStorage for InMemoryAccountStorage {
    fn insert(&self, holder_name: &str, account_number: &str) -> Result<Account, LedgerError> {
        let mut assigned = None;

        // The index entry stays locked until the row is in place.
        let index_entry = self
            .numbers
            .entry(account_number.to_string())
            .or_insert_with(|| {
                let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                assigned = Some(id);
                id
            });

        let Some(id) = assigned else {
            return Err(LedgerError::duplicate_account_number(account_number));
        };

        let account = Account {
            id,
            holder_name: holder_name.to_string(),
            account_number: account_number.to_string(),
        };
        self.accounts.insert(id, account.clone());
        drop(index_entry);

        Ok(account)
    }

    fn get(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    fn scan(&self, filter: &AccountFilter) -> Result<Vec<Account>, LedgerError> {
        let mut matches: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by_key(|account| account.id);
        Ok(matches)
    }
}

/// Append-only ledger partitioned by account
#[derive(Debug, Default)]
pub struct InMemoryLedgerStorage {
    /// Entries of each account in append order
    entries: DashMap<AccountId, Vec<Transaction>>,

    /// Last id handed out
    last_id: AtomicU64,
}

impl InMemoryLedgerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-insert an entry that already has an id (snapshot restore)
    ///
    /// Entries must be restored in id order.
    pub fn restore(&self, transaction: Transaction) -> Result<(), LedgerError> {
        if transaction.amount <= Decimal::ZERO {
            return Err(LedgerError::internal(format!(
                "snapshot entry {} has non-positive amount {}",
                transaction.id, transaction.amount
            )));
        }

        let mut slot = self
            .entries
            .entry(transaction.account_id)
            .or_insert_with(Vec::new);
        if slot.last().is_some_and(|last| last.id >= transaction.id) {
            return Err(LedgerError::internal(format!(
                "snapshot entry {} is out of order",
                transaction.id
            )));
        }
        self.last_id.fetch_max(transaction.id, Ordering::SeqCst);
        slot.push(transaction);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStorage for InMemoryLedgerStorage {
    fn insert(&self, entry: NewTransaction) -> Result<Transaction, LedgerError> {
        let mut slot = self.entries.entry(entry.account_id).or_insert_with(Vec::new);
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let transaction = entry.with_id(id);
        slot.push(transaction.clone());
        Ok(transaction)
    }

    fn sum_by_kind(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
    ) -> Result<Decimal, LedgerError> {
        let Some(entries) = self.entries.get(&account_id) else {
            return Ok(Decimal::ZERO);
        };

        entries
            .iter()
            .filter(|transaction| transaction.kind == kind)
            .try_fold(Decimal::ZERO, |total, transaction| {
                total.checked_add(transaction.amount)
            })
            .ok_or_else(|| LedgerError::arithmetic_overflow("sum_by_kind", account_id))
    }

    fn last_entry(&self, account_id: AccountId) -> Result<Option<Transaction>, LedgerError> {
        Ok(self
            .entries
            .get(&account_id)
            .and_then(|entries| entries.value().last().cloned()))
    }

    fn entries(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .entries
            .get(&account_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default())
    }

    fn all_entries(&self) -> Result<Vec<Transaction>, LedgerError> {
        let mut all: Vec<Transaction> = self
            .entries
            .iter()
            .flat_map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|transaction| transaction.id);
        Ok(all)
    }
}
