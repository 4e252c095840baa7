use crate::batch::BatchConfig;
use crate::core::CoordinatorConfig;
use crate::types::AccountId;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Bank accounts over an append-only ledger
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Bank accounts with ledger-derived balances", long_about = None)]
pub struct CliArgs {
    /// Directory holding the accounts and transactions snapshot
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "BANK_LEDGER_DATA_DIR",
        default_value = ".bank-ledger"
    )]
    pub data_dir: PathBuf,

    /// Longest wait for an account's critical section, in milliseconds
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MS",
        env = "BANK_LEDGER_LOCK_TIMEOUT_MS",
        default_value_t = 5000
    )]
    pub lock_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a new account
    CreateAccount {
        #[arg(long, value_name = "NAME")]
        holder: String,
        #[arg(long, value_name = "NUMBER")]
        number: String,
    },

    /// Find accounts by holder name substring and/or exact number
    Search {
        #[arg(long, value_name = "SUBSTR")]
        name: Option<String>,
        #[arg(long, value_name = "NUMBER")]
        number: Option<String>,
    },

    /// Credit an account
    Deposit {
        #[arg(long, value_name = "ID")]
        account: AccountId,
        #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
        amount: String,
    },

    /// Debit an account if the balance covers it
    Withdraw {
        #[arg(long, value_name = "ID")]
        account: AccountId,
        #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
        amount: String,
    },

    /// Show an account's derived balance
    Balance {
        #[arg(long, value_name = "ID")]
        account: AccountId,
    },

    /// List an account's ledger entries
    History {
        #[arg(long, value_name = "ID")]
        account: AccountId,
    },

    /// Run a CSV file of requests
    Batch {
        /// Request file with columns op,account,name,number,amount
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(
            long = "mode",
            value_name = "MODE",
            default_value = "sequential",
            help = "'sequential' for input order or 'concurrent' for one task per request"
        )]
        mode: ProcessingMode,

        #[arg(
            long = "batch-size",
            value_name = "SIZE",
            help = "Number of requests per batch (default: 1000)"
        )]
        batch_size: Option<usize>,

        #[arg(
            long = "max-concurrent",
            value_name = "COUNT",
            help = "Maximum number of requests executing at once (default: CPU cores)"
        )]
        max_concurrent: Option<usize>,
    },
}

/// How requests inside a batch are scheduled
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProcessingMode {
    Sequential,
    Concurrent,
}

impl CliArgs {
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::new(Duration::from_millis(self.lock_timeout_ms))
    }
}

impl Command {
    /// Batch configuration for the `batch` subcommand, `None` otherwise
    pub fn batch_config(&self) -> Option<BatchConfig> {
        match self {
            Command::Batch {
                batch_size,
                max_concurrent,
                ..
            } => {
                let default = BatchConfig::default();
                Some(BatchConfig::new(
                    batch_size.unwrap_or(default.batch_size),
                    max_concurrent.unwrap_or(default.max_concurrent),
                ))
            }
            _ => None,
        }
    }
}
