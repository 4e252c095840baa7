//! CSV format handling for batch requests and command output
//!
//! This module centralizes all CSV format concerns, providing:
//! - RequestRecord structure for deserialization
//! - Conversion from CSV records to batch requests
//! - Serialization of outcomes, accounts, balances and ledger entries
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::batch::{Outcome, Reply, Request};
use crate::types::{parse_amount, Account, AccountBalance, AccountId, LedgerError, Transaction};
use csv::Writer;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the request format with columns: op, account, name, number,
/// amount. Which columns are required depends on `op`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct RequestRecord {
    pub op: String,
    pub account: Option<String>,
    pub name: Option<String>,
    pub number: Option<String>,
    pub amount: Option<String>,
}

/// Convert a RequestRecord to a Request
///
/// | op         | required columns |
/// |------------|------------------|
/// | `create`   | name, number     |
/// | `search`   | name and/or number |
/// | `deposit`  | account, amount  |
/// | `withdraw` | account, amount  |
/// | `balance`  | account          |
///
/// Field-level validation of names and numbers is left to the account
/// store so the batch path reports the same errors as direct calls.
pub fn convert_request_record(record: RequestRecord) -> Result<Request, LedgerError> {
    match record.op.trim().to_lowercase().as_str() {
        "create" => Ok(Request::CreateAccount {
            holder_name: record.name.unwrap_or_default(),
            account_number: record.number.unwrap_or_default(),
        }),
        "search" => Ok(Request::Search {
            name: record.name,
            number: record.number,
        }),
        "deposit" => Ok(Request::Deposit {
            account_id: parse_account(record.account.as_deref())?,
            amount: required_amount(record.amount.as_deref())?,
        }),
        "withdraw" => Ok(Request::Withdraw {
            account_id: parse_account(record.account.as_deref())?,
            amount: required_amount(record.amount.as_deref())?,
        }),
        "balance" => Ok(Request::Balance {
            account_id: parse_account(record.account.as_deref())?,
        }),
        other => Err(LedgerError::invalid_input(format!(
            "unknown operation '{}'",
            other
        ))),
    }
}

fn parse_account(raw: Option<&str>) -> Result<AccountId, LedgerError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(LedgerError::invalid_input("account id is required"));
    }
    raw.parse::<AccountId>()
        .map_err(|_| LedgerError::invalid_input(format!("invalid account id '{}'", raw)))
}

fn required_amount(raw: Option<&str>) -> Result<Decimal, LedgerError> {
    match raw.map(str::trim) {
        Some(amount) if !amount.is_empty() => parse_amount(amount),
        _ => Err(LedgerError::invalid_input("amount is required")),
    }
}

/// Balances are printed with two decimal places, rounding half away from zero
fn format_balance(balance: Decimal) -> String {
    let mut cents = balance.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    cents.to_string()
}

/// Write batch outcomes, sorted by input position
///
/// Columns: seq, op, status, account_id, transaction_id, balance, message.
/// `status` is `ok` or the error kind.
pub fn write_outcomes_csv(outcomes: &[Outcome], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record([
        "seq",
        "op",
        "status",
        "account_id",
        "transaction_id",
        "balance",
        "message",
    ])?;

    let mut sorted: Vec<&Outcome> = outcomes.iter().collect();
    sorted.sort_by_key(|outcome| outcome.seq);

    for outcome in sorted {
        let (status, account_id, transaction_id, balance, message) = match &outcome.result {
            Ok(Reply::Created(account)) => (
                "ok",
                Some(account.id),
                None,
                None,
                String::new(),
            ),
            Ok(Reply::Found(accounts)) => (
                "ok",
                None,
                None,
                None,
                format!(
                    "accounts={}",
                    accounts
                        .iter()
                        .map(|account| account.id.to_string())
                        .collect::<Vec<_>>()
                        .join(";")
                ),
            ),
            Ok(Reply::Posted(transaction)) => (
                "ok",
                Some(transaction.account_id),
                Some(transaction.id),
                None,
                String::new(),
            ),
            Ok(Reply::Balance(report)) => (
                "ok",
                Some(report.account.id),
                None,
                Some(format_balance(report.balance)),
                String::new(),
            ),
            Err(err) => (err.kind(), None, None, None, err.to_string()),
        };

        writer.write_record([
            outcome.seq.to_string(),
            outcome.op.clone(),
            status.to_string(),
            account_id.map(|id| id.to_string()).unwrap_or_default(),
            transaction_id.map(|id| id.to_string()).unwrap_or_default(),
            balance.unwrap_or_default(),
            message,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write accounts with columns: id, holder_name, account_number
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["id", "holder_name", "account_number"])?;
    for account in accounts {
        writer.write_record([
            account.id.to_string(),
            account.holder_name.clone(),
            account.account_number.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a balance report with columns: account_id, account_number,
/// account_holder, balance
pub fn write_balance_csv(report: &AccountBalance, output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["account_id", "account_number", "account_holder", "balance"])?;
    writer.write_record([
        report.account.id.to_string(),
        report.account.account_number.clone(),
        report.account.holder_name.clone(),
        format_balance(report.balance),
    ])?;
    writer.flush()?;
    Ok(())
}

/// Write ledger entries with columns: id, account_id, kind, amount,
/// timestamp (RFC 3339)
pub fn write_transactions_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(["id", "account_id", "kind", "amount", "timestamp"])?;
    for transaction in transactions {
        writer.write_record([
            transaction.id.to_string(),
            transaction.account_id.to_string(),
            transaction.kind.to_string(),
            transaction.amount.to_string(),
            transaction.timestamp.to_rfc3339(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn record(op: &str, account: Option<&str>, amount: Option<&str>) -> RequestRecord {
        RequestRecord {
            op: op.to_string(),
            account: account.map(str::to_string),
            amount: amount.map(str::to_string),
            ..RequestRecord::default()
        }
    }

    fn alice() -> Account {
        Account {
            id: 1,
            holder_name: "Alice".to_string(),
            account_number: "1001".to_string(),
        }
    }

    #[rstest]
    #[case::deposit("deposit", Request::Deposit { account_id: 1, amount: Decimal::new(10000, 2) })]
    #[case::withdraw("withdraw", Request::Withdraw { account_id: 1, amount: Decimal::new(10000, 2) })]
    #[case::case_insensitive(" DEPOSIT ", Request::Deposit { account_id: 1, amount: Decimal::new(10000, 2) })]
    fn test_convert_money_requests(#[case] op: &str, #[case] expected: Request) {
        let request = convert_request_record(record(op, Some("1"), Some("100.00"))).unwrap();
        assert_eq!(request, expected);
    }

    #[test]
    fn test_convert_create_and_search() {
        let create = RequestRecord {
            op: "create".to_string(),
            name: Some("Alice".to_string()),
            number: Some("1001".to_string()),
            ..RequestRecord::default()
        };
        assert_eq!(
            convert_request_record(create).unwrap(),
            Request::CreateAccount {
                holder_name: "Alice".to_string(),
                account_number: "1001".to_string()
            }
        );

        let search = RequestRecord {
            op: "search".to_string(),
            name: Some("Ali".to_string()),
            ..RequestRecord::default()
        };
        assert_eq!(
            convert_request_record(search).unwrap(),
            Request::Search {
                name: Some("Ali".to_string()),
                number: None
            }
        );
    }

    #[rstest]
    #[case::unknown_op("transfer", Some("1"), Some("1.00"), "invalid_input")]
    #[case::missing_account("deposit", None, Some("1.00"), "invalid_input")]
    #[case::bad_account("balance", Some("one"), None, "invalid_input")]
    #[case::negative_account("withdraw", Some("-1"), Some("1.00"), "invalid_input")]
    #[case::missing_amount("deposit", Some("1"), None, "invalid_input")]
    #[case::blank_amount("withdraw", Some("1"), Some("  "), "invalid_input")]
    #[case::zero_amount("deposit", Some("1"), Some("0"), "invalid_amount")]
    #[case::negative_amount("withdraw", Some("1"), Some("-3"), "invalid_amount")]
    #[case::nan_amount("deposit", Some("1"), Some("NaN"), "invalid_amount")]
    fn test_convert_errors(
        #[case] op: &str,
        #[case] account: Option<&str>,
        #[case] amount: Option<&str>,
        #[case] expected_kind: &str,
    ) {
        let err = convert_request_record(record(op, account, amount)).unwrap_err();
        assert_eq!(err.kind(), expected_kind);
    }

    #[test]
    fn test_write_outcomes_sorted_by_seq() {
        let posted = Transaction {
            id: 3,
            account_id: 1,
            kind: TransactionKind::Debit,
            amount: Decimal::new(4000, 2),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let outcomes = vec![
            Outcome {
                seq: 3,
                op: "withdraw".to_string(),
                result: Ok(Reply::Posted(posted)),
            },
            Outcome {
                seq: 1,
                op: "create".to_string(),
                result: Ok(Reply::Created(alice())),
            },
            Outcome {
                seq: 4,
                op: "withdraw".to_string(),
                result: Err(LedgerError::insufficient_funds(
                    1,
                    Decimal::new(6000, 2),
                    Decimal::new(15000, 2),
                )),
            },
            Outcome {
                seq: 2,
                op: "balance".to_string(),
                result: Ok(Reply::Balance(AccountBalance {
                    account: alice(),
                    balance: Decimal::new(10000, 2),
                })),
            },
            Outcome {
                seq: 5,
                op: "search".to_string(),
                result: Ok(Reply::Found(vec![alice(), Account { id: 4, ..alice() }])),
            },
        ];

        let mut output = Vec::new();
        write_outcomes_csv(&outcomes, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "seq,op,status,account_id,transaction_id,balance,message\n\
             1,create,ok,1,,,\n\
             2,balance,ok,1,,100.00,\n\
             3,withdraw,ok,1,3,,\n\
             4,withdraw,insufficient_funds,,,,\"Insufficient funds for account 1: balance 60.00, requested 150.00\"\n\
             5,search,ok,,,,accounts=1;4\n"
        );
    }

    #[rstest]
    #[case::empty(vec![], "id,holder_name,account_number\n")]
    #[case::quoted(
        vec![Account { id: 2, holder_name: "Smith, Jane".to_string(), account_number: "2002".to_string() }],
        "id,holder_name,account_number\n2,\"Smith, Jane\",2002\n"
    )]
    fn test_write_accounts_csv(#[case] accounts: Vec<Account>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_accounts_csv(&accounts, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_balance_csv() {
        let mut output = Vec::new();
        let report = AccountBalance {
            account: alice(),
            balance: Decimal::new(6000, 2),
        };
        write_balance_csv(&report, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account_id,account_number,account_holder,balance\n1,1001,Alice,60.00\n"
        );
    }

    #[rstest]
    #[case::whole(Decimal::new(50, 0), "50.00")]
    #[case::zero(Decimal::ZERO, "0.00")]
    #[case::one_place(Decimal::new(405, 1), "40.50")]
    #[case::cents(Decimal::new(6000, 2), "60.00")]
    #[case::rounds_half_up(Decimal::new(125, 3), "0.13")]
    #[case::rounds_down(Decimal::new(12344, 4), "1.23")]
    fn test_write_balance_csv_uses_two_places(#[case] balance: Decimal, #[case] expected: &str) {
        let mut output = Vec::new();
        let report = AccountBalance {
            account: alice(),
            balance,
        };
        write_balance_csv(&report, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!(
                "account_id,account_number,account_holder,balance\n1,1001,Alice,{}\n",
                expected
            )
        );
    }

    #[test]
    fn test_write_transactions_csv() {
        let mut output = Vec::new();
        let entries = vec![Transaction {
            id: 1,
            account_id: 1,
            kind: TransactionKind::Credit,
            amount: Decimal::new(10000, 2),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
        }];
        write_transactions_csv(&entries, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,account_id,kind,amount,timestamp\n1,1,credit,100.00,2024-05-06T07:08:09+00:00\n"
        );
    }
}
