//! Error types for the bank ledger
//!
//! Every failure of a core operation is one of six kinds. All of them are
//! terminal for the request that triggered them; nothing in the core
//! retries.
//!
//! # Error Categories
//!
//! - **Caller errors**: invalid input, invalid amount, unknown account,
//!   duplicate account number
//! - **Business rule**: insufficient funds for a withdrawal
//! - **Internal**: storage, I/O, lock acquisition and arithmetic failures

use super::account::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Malformed or missing required fields
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the request
        message: String,
    },

    /// The account number is already registered
    ///
    /// No record is created when this is returned.
    #[error("Account number '{account_number}' already exists")]
    DuplicateAccountNumber {
        /// The conflicting account number
        account_number: String,
    },

    /// The referenced account does not exist
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// The identifier that did not resolve
        account_id: AccountId,
    },

    /// Amount is zero, negative, malformed or non-finite
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The rejected amount as supplied
        amount: String,
    },

    /// Withdrawal amount exceeds the current balance
    ///
    /// The ledger is left unchanged.
    #[error("Insufficient funds for account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account the withdrawal targeted
        account_id: AccountId,
        /// Balance observed inside the critical section
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// Storage, locking or I/O failure
    #[error("Internal error: {message}")]
    Internal {
        /// Description for logs; opaque to callers
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Internal {
            message: format!("I/O error: {}", error),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error
            .position()
            .map(|pos| format!(" at line {}", pos.line()))
            .unwrap_or_default();
        LedgerError::Internal {
            message: format!("CSV error{}: {}", line, error),
        }
    }
}

impl LedgerError {
    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a DuplicateAccountNumber error
    pub fn duplicate_account_number(account_number: &str) -> Self {
        LedgerError::DuplicateAccountNumber {
            account_number: account_number.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: AccountId) -> Self {
        LedgerError::AccountNotFound { account_id }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl ToString) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account_id: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account_id,
            balance,
            requested,
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        LedgerError::Internal {
            message: message.into(),
        }
    }

    /// Create the Internal error reported when the per-account critical
    /// section cannot be entered in time
    pub fn lock_timeout(account_id: AccountId) -> Self {
        LedgerError::Internal {
            message: format!("timed out waiting for the lock on account {}", account_id),
        }
    }

    /// Create the Internal error reported on decimal overflow
    pub fn arithmetic_overflow(operation: &str, account_id: AccountId) -> Self {
        LedgerError::Internal {
            message: format!(
                "arithmetic overflow in {} for account {}",
                operation, account_id
            ),
        }
    }

    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput { .. } => "invalid_input",
            LedgerError::DuplicateAccountNumber { .. } => "duplicate_account_number",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::Internal { .. } => "internal_error",
        }
    }

    /// HTTP-style status a transport layer reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerError::InvalidInput { .. } => 400,
            LedgerError::DuplicateAccountNumber { .. } => 409,
            LedgerError::AccountNotFound { .. } => 404,
            LedgerError::InvalidAmount { .. } => 422,
            LedgerError::InsufficientFunds { .. } => 402,
            LedgerError::Internal { .. } => 500,
        }
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            LedgerError::InvalidInput { .. } => 2,
            LedgerError::DuplicateAccountNumber { .. } => 3,
            LedgerError::AccountNotFound { .. } => 4,
            LedgerError::InvalidAmount { .. } => 5,
            LedgerError::InsufficientFunds { .. } => 6,
            LedgerError::Internal { .. } => 7,
        }
    }
}
