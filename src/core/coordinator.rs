//! Balance derivation and overdraft-safe withdrawals
//!
//! `BalanceCoordinator` never stores a balance. Every read sums the ledger:
//!
//! ```text
//! balance = Σ credits − Σ debits
//! ```
//!
//! # Critical section
//!
//! A withdrawal reads the balance, compares it with the requested amount and
//! appends a debit. Those three steps run under the account's entry in
//! [`AccountLocks`], so two concurrent withdrawals can never both pass the
//! check against the same pre-withdrawal balance. Deposits append under the
//! same lock, checking only that the credit total stays representable, so
//! that per account entry ids and timestamps are handed out in the same
//! order. Timestamps are clamped to the account's latest entry and never go
//! backwards, even if the clock does.
//!
//! Work on different accounts never shares a lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{AccountLocks, AccountStore, TransactionLedger};
use crate::storage::Clock;
use crate::types::{AccountBalance, AccountId, LedgerError, Transaction, TransactionKind};

/// Tunables for the coordinator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Longest wait for an account's critical section before failing
    pub lock_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
        }
    }
}

impl CoordinatorConfig {
    pub fn new(lock_timeout: Duration) -> Self {
        Self { lock_timeout }
    }
}

/// Deposits, withdrawals and balance reads
#[derive(Clone)]
pub struct BalanceCoordinator {
    accounts: AccountStore,
    ledger: TransactionLedger,
    clock: Arc<dyn Clock>,
    locks: Arc<AccountLocks>,
    config: CoordinatorConfig,
}

impl BalanceCoordinator {
    pub fn new(
        accounts: AccountStore,
        ledger: TransactionLedger,
        clock: Arc<dyn Clock>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            accounts,
            ledger,
            clock,
            locks: Arc::new(AccountLocks::new()),
            config,
        }
    }

    /// Current balance of the account
    pub fn get_balance(&self, account_id: AccountId) -> Result<Decimal, LedgerError> {
        let credits = self.ledger.sum_by_kind(account_id, TransactionKind::Credit)?;
        let debits = self.ledger.sum_by_kind(account_id, TransactionKind::Debit)?;
        let balance = credits
            .checked_sub(debits)
            .ok_or_else(|| LedgerError::arithmetic_overflow("balance", account_id))?;

        debug!(account_id, %credits, %debits, %balance, "balance derived");
        Ok(balance)
    }

    /// Account details together with its current balance
    pub fn statement(&self, account_id: AccountId) -> Result<AccountBalance, LedgerError> {
        let account = self.accounts.get_account(account_id)?;
        let balance = self.get_balance(account_id)?;
        Ok(AccountBalance { account, balance })
    }

    /// Credit the account
    ///
    /// # Errors
    ///
    /// * `AccountNotFound` - the account does not exist
    /// * `InvalidAmount` - amount is zero or negative, or the account's
    ///   credit total could no longer be represented after adding it
    /// * `Internal` - the account's critical section could not be entered
    pub fn deposit(&self, account_id: AccountId, amount: Decimal) -> Result<Transaction, LedgerError> {
        self.validate(account_id, amount)?;

        self.locks
            .run_exclusive(account_id, self.config.lock_timeout, || {
                // Debits never exceed credits, so bounding credits bounds every sum
                let credits = self.ledger.sum_by_kind(account_id, TransactionKind::Credit)?;
                if credits.checked_add(amount).is_none() {
                    warn!(account_id, %credits, %amount, "deposit rejected, credit total would overflow");
                    return Err(LedgerError::invalid_amount(amount));
                }

                self.ledger.append(
                    account_id,
                    TransactionKind::Credit,
                    amount,
                    self.next_timestamp(account_id)?,
                )
            })
    }

    /// Debit the account if, and only if, the balance covers the amount
    ///
    /// The balance read, the check and the append form one atomic unit per
    /// account.
    ///
    /// # Errors
    ///
    /// * `AccountNotFound` - the account does not exist
    /// * `InvalidAmount` - amount is zero or negative
    /// * `InsufficientFunds` - amount exceeds the balance; nothing is written
    /// * `Internal` - the account's critical section could not be entered
    pub fn withdraw(&self, account_id: AccountId, amount: Decimal) -> Result<Transaction, LedgerError> {
        self.validate(account_id, amount)?;

        self.locks
            .run_exclusive(account_id, self.config.lock_timeout, || {
                let balance = self.get_balance(account_id)?;
                if amount > balance {
                    warn!(account_id, %balance, %amount, "withdrawal rejected");
                    return Err(LedgerError::insufficient_funds(account_id, balance, amount));
                }

                self.ledger.append(
                    account_id,
                    TransactionKind::Debit,
                    amount,
                    self.next_timestamp(account_id)?,
                )
            })
    }

    /// Entries of the account in append order
    pub fn history(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.ledger.history(account_id)
    }

    /// Clock reading, never earlier than the account's latest entry
    ///
    /// Must be called inside the account's critical section.
    fn next_timestamp(&self, account_id: AccountId) -> Result<DateTime<Utc>, LedgerError> {
        let now = self.clock.now();
        Ok(match self.ledger.latest_timestamp(account_id)? {
            Some(latest) if latest > now => latest,
            _ => now,
        })
    }

    fn validate(&self, account_id: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        self.accounts.ensure_exists(account_id)?;
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn locks(&self) -> &AccountLocks {
        &self.locks
    }
}
