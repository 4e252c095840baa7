//! Execution of request batches against a shared bank
//!
//! # Modes
//!
//! - **Sequential**: requests run one after another in input order, which
//!   makes the output fully deterministic.
//! - **Concurrent**: every request becomes its own blocking task, bounded by
//!   `max_concurrent`. Requests for the same account race exactly like
//!   independent callers would; the coordinator's per-account critical
//!   section keeps every balance non-negative regardless of interleaving.
//!
//! The core is synchronous (it may wait on an account lock), so requests run
//! on tokio's blocking pool rather than on the async workers.

use futures::stream::{self, StreamExt};
use tracing::{debug, error};

use super::{Outcome, Reply, Request, RequestLine};
use crate::core::Bank;
use crate::types::LedgerError;

/// Executes requests against a bank
///
/// Cheap to clone; clones share the bank.
#[derive(Clone)]
pub struct BatchProcessor {
    bank: Bank,
}

impl BatchProcessor {
    pub fn new(bank: Bank) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Run a single request
    pub fn execute(&self, request: Request) -> Result<Reply, LedgerError> {
        match request {
            Request::CreateAccount {
                holder_name,
                account_number,
            } => self
                .bank
                .create_account(&holder_name, &account_number)
                .map(Reply::Created),
            Request::Search { name, number } => self
                .bank
                .find_accounts(name.as_deref(), number.as_deref())
                .map(Reply::Found),
            Request::Deposit { account_id, amount } => {
                self.bank.deposit(account_id, amount).map(Reply::Posted)
            }
            Request::Withdraw { account_id, amount } => {
                self.bank.withdraw(account_id, amount).map(Reply::Posted)
            }
            Request::Balance { account_id } => {
                self.bank.statement(account_id).map(Reply::Balance)
            }
        }
    }

    /// Run one input line, turning conversion errors into failed outcomes
    pub fn process_line(&self, line: RequestLine) -> Outcome {
        let result = line.request.and_then(|request| self.execute(request));
        if let Err(err) = &result {
            debug!(seq = line.seq, op = %line.op, error = %err, "request failed");
        }
        Outcome {
            seq: line.seq,
            op: line.op,
            result,
        }
    }

    /// Run a batch in input order
    pub async fn process_sequential(&self, batch: Vec<RequestLine>) -> Vec<Outcome> {
        let processor = self.clone();
        let fallback: Vec<(u64, String)> = batch
            .iter()
            .map(|line| (line.seq, line.op.clone()))
            .collect();

        match tokio::task::spawn_blocking(move || {
            batch
                .into_iter()
                .map(|line| processor.process_line(line))
                .collect::<Vec<_>>()
        })
        .await
        {
            Ok(outcomes) => outcomes,
            Err(e) => {
                error!(error = %e, "sequential batch task failed");
                fallback
                    .into_iter()
                    .map(|(seq, op)| task_failed(seq, op, &e))
                    .collect()
            }
        }
    }

    /// Run every request of a batch as its own task
    ///
    /// Outcomes come back in completion order.
    pub async fn process_concurrent(
        &self,
        batch: Vec<RequestLine>,
        max_concurrent: usize,
    ) -> Vec<Outcome> {
        stream::iter(batch.into_iter().map(|line| {
            let processor = self.clone();
            let seq = line.seq;
            let op = line.op.clone();
            async move {
                match tokio::task::spawn_blocking(move || processor.process_line(line)).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(seq, error = %e, "request task failed");
                        task_failed(seq, op, &e)
                    }
                }
            }
        }))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
    }
}

fn task_failed(seq: u64, op: String, e: &tokio::task::JoinError) -> Outcome {
    Outcome {
        seq,
        op,
        result: Err(LedgerError::internal(format!("request task failed: {}", e))),
    }
}
