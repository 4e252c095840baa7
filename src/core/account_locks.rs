//! Per-account critical sections
//!
//! `AccountLocks` hands out one mutex per account id. Holding it makes a
//! sequence of ledger reads and an append indivisible with respect to every
//! other holder for the same account, while different accounts never wait
//! on each other.
//!
//! Acquisition is bounded: a caller that cannot enter the critical section
//! within the timeout gets an `Internal` error instead of proceeding.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use tracing::warn;

use crate::types::{AccountId, LedgerError};

/// Registry of per-account mutexes
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `account_id`
    ///
    /// The registry's shard lock is released before waiting, so a slow
    /// holder on one account does not stall lookups for others.
    pub fn run_exclusive<T, F>(
        &self,
        account_id: AccountId,
        timeout: Duration,
        f: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce() -> Result<T, LedgerError>,
    {
        let lock = self.lock_for(account_id);
        let _guard = Self::acquire(&lock, account_id, timeout)?;
        f()
    }

    fn lock_for(&self, account_id: AccountId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .entry(account_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    fn acquire(
        lock: &Mutex<()>,
        account_id: AccountId,
        timeout: Duration,
    ) -> Result<MutexGuard<'_, ()>, LedgerError> {
        lock.try_lock_for(timeout).ok_or_else(|| {
            warn!(account_id, timeout_ms = timeout.as_millis() as u64, "lock acquisition timed out");
            LedgerError::lock_timeout(account_id)
        })
    }

    /// Number of accounts that have had a critical section so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
