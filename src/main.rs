//! Bank Ledger CLI
//!
//! # Usage
//!
//! ```bash
//! bank-ledger create-account --holder "Alice Smith" --number 1001
//! bank-ledger deposit --account 1 --amount 100.00
//! bank-ledger withdraw --account 1 --amount 40.00
//! bank-ledger balance --account 1
//! bank-ledger search --name Smith
//! bank-ledger history --account 1
//! bank-ledger batch --mode concurrent --max-concurrent 8 requests.csv > outcomes.csv
//! ```
//!
//! State lives in `--data-dir` (env `BANK_LEDGER_DATA_DIR`). Results are
//! written to stdout as CSV; logs go to stderr (`RUST_LOG` controls them).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 2: Invalid input
//! - 3: Duplicate account number
//! - 4: Account not found
//! - 5: Invalid amount
//! - 6: Insufficient funds
//! - 7: Internal error

use bank_ledger::{cli, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    match cli::run(args, &mut output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
