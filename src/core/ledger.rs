//! Append-only transaction ledger
//!
//! `TransactionLedger` owns the credit/debit entries of every account. It
//! validates that the account exists and that the amount is positive, but
//! performs no balance check: that is the coordinator's job, done inside a
//! per-account critical section that wraps a balance read and `append`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use super::AccountStore;
use crate::storage::LedgerStorage;
use crate::types::{AccountId, LedgerError, NewTransaction, Transaction, TransactionKind};

#[derive(Clone)]
pub struct TransactionLedger {
    accounts: AccountStore,
    storage: Arc<dyn LedgerStorage>,
}

impl TransactionLedger {
    pub fn new(accounts: AccountStore, storage: Arc<dyn LedgerStorage>) -> Self {
        Self { accounts, storage }
    }

    /// Append an entry to the account's ledger
    ///
    /// # Errors
    ///
    /// * `AccountNotFound` - the account does not exist
    /// * `InvalidAmount` - amount is zero or negative
    pub fn append(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        self.accounts.ensure_exists(account_id)?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        let transaction = self.storage.insert(NewTransaction {
            account_id,
            kind,
            amount,
            timestamp,
        })?;

        info!(
            transaction_id = transaction.id,
            account_id,
            %kind,
            %amount,
            "entry posted"
        );
        Ok(transaction)
    }

    /// Total amount of all `kind` entries for the account, zero if none
    pub fn sum_by_kind(
        &self,
        account_id: AccountId,
        kind: TransactionKind,
    ) -> Result<Decimal, LedgerError> {
        self.accounts.ensure_exists(account_id)?;
        self.storage.sum_by_kind(account_id, kind)
    }

    /// Timestamp of the account's latest entry, if any
    pub fn latest_timestamp(
        &self,
        account_id: AccountId,
    ) -> Result<Option<DateTime<Utc>>, LedgerError> {
        Ok(self
            .storage
            .last_entry(account_id)?
            .map(|transaction| transaction.timestamp))
    }

    /// Entries of the account in append order
    pub fn history(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.accounts.ensure_exists(account_id)?;
        self.storage.entries(account_id)
    }
}
