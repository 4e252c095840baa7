//! Transaction-related types for the bank ledger
//!
//! This module defines ledger entries, the closed set of entry kinds and
//! the amount parsing used at the edges of the system.

use super::account::AccountId;
use super::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction identifier, assigned by storage starting at 1
pub type TransactionId = u64;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Increases the derived balance (deposit)
    Credit,

    /// Decreases the derived balance (withdrawal)
    Debit,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Credit => f.write_str("credit"),
            TransactionKind::Debit => f.write_str("debit"),
        }
    }
}

/// A posted ledger entry
///
/// Entries are immutable once appended. There is no pending, reversed or
/// voided state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub kind: TransactionKind,

    /// Strictly positive amount
    pub amount: Decimal,

    /// Set at append time
    pub timestamp: DateTime<Utc>,
}

/// A ledger entry that has not been assigned an identifier yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl NewTransaction {
    /// Attach a storage-assigned identifier
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            kind: self.kind,
            amount: self.amount,
            timestamp: self.timestamp,
        }
    }
}

/// Parse a caller-supplied amount
///
/// Rejects malformed and non-finite text as well as zero and negative
/// values.
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    let amount = Decimal::from_str(trimmed).map_err(|_| LedgerError::invalid_amount(trimmed))?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(trimmed));
    }
    Ok(amount)
}
