//! Account identity and uniqueness
//!
//! `AccountStore` validates requests and delegates persistence to an
//! injected [`AccountStorage`]. It knows nothing about transactions.

use std::sync::Arc;

use tracing::{debug, info};

use crate::storage::AccountStorage;
use crate::types::{Account, AccountFilter, AccountId, LedgerError};

/// Account creation, lookup and search
#[derive(Clone)]
pub struct AccountStore {
    storage: Arc<dyn AccountStorage>,
}

impl AccountStore {
    pub fn new(storage: Arc<dyn AccountStorage>) -> Self {
        Self { storage }
    }

    /// Register a new account
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - holder name or account number is empty
    /// * `DuplicateAccountNumber` - the number is already registered
    pub fn create_account(
        &self,
        holder_name: &str,
        account_number: &str,
    ) -> Result<Account, LedgerError> {
        let holder_name = holder_name.trim();
        let account_number = account_number.trim();

        if holder_name.is_empty() || account_number.is_empty() {
            return Err(LedgerError::invalid_input(
                "account holder name and account number are required",
            ));
        }

        let account = self.storage.insert(holder_name, account_number)?;
        info!(
            account_id = account.id,
            account_number = %account.account_number,
            "account created"
        );
        Ok(account)
    }

    /// Fetch an account by id, failing with `AccountNotFound`
    pub fn get_account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        self.storage
            .get(account_id)?
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Fail with `AccountNotFound` unless the account exists
    pub fn ensure_exists(&self, account_id: AccountId) -> Result<(), LedgerError> {
        self.get_account(account_id).map(|_| ())
    }

    /// Search accounts by holder-name substring and/or exact number
    ///
    /// Blank filter strings count as absent; other filters are used as
    /// given. At least one filter is required; no match is an empty result,
    /// not an error.
    pub fn find_accounts(
        &self,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Vec<Account>, LedgerError> {
        let filter = AccountFilter {
            name: non_empty(name),
            number: non_empty(number),
        };

        if filter.is_unbounded() {
            return Err(LedgerError::invalid_input(
                "provide a holder name or an account number to search",
            ));
        }

        let accounts = self.storage.scan(&filter)?;
        debug!(?filter, found = accounts.len(), "account search");
        Ok(accounts)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}
