//! Requests and outcomes exchanged with the batch processor

use rust_decimal::Decimal;

use crate::types::{Account, AccountBalance, AccountId, LedgerError, Transaction};

/// One operation against the bank
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateAccount {
        holder_name: String,
        account_number: String,
    },
    Search {
        name: Option<String>,
        number: Option<String>,
    },
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },
    Balance {
        account_id: AccountId,
    },
}

/// A request as read from input, with its 1-based position
///
/// Rows that could not be turned into a request keep their conversion
/// error so they still produce an outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestLine {
    pub seq: u64,
    pub op: String,
    pub request: Result<Request, LedgerError>,
}

/// Successful result of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Created(Account),
    Found(Vec<Account>),
    Posted(Transaction),
    Balance(AccountBalance),
}

/// Result of one request line
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub seq: u64,
    pub op: String,
    pub result: Result<Reply, LedgerError>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
