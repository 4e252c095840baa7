// CLI module
// Command-line interface, argument parsing and command execution

mod args;

pub use args::{CliArgs, Command, ProcessingMode};

use crate::batch;
use crate::core::Bank;
use crate::io::{
    write_accounts_csv, write_balance_csv, write_outcomes_csv, write_transactions_csv,
};
use crate::storage::{load_snapshot, save_snapshot};
use crate::types::{parse_amount, LedgerError};
use clap::Parser;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints a message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Execute a parsed command, writing CSV results to `output`
///
/// The snapshot in `--data-dir` is loaded first and written back after any
/// command that can change state.
pub fn run(args: CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    let bank = Bank::from_snapshot(load_snapshot(&args.data_dir)?, args.coordinator_config());

    let persist = |bank: &Bank| {
        save_snapshot(&args.data_dir, bank.account_storage(), bank.ledger_storage())
    };

    match &args.command {
        Command::CreateAccount { holder, number } => {
            let account = bank.create_account(holder, number)?;
            persist(&bank)?;
            write_accounts_csv(&[account], output)
        }
        Command::Search { name, number } => {
            let accounts = bank.find_accounts(name.as_deref(), number.as_deref())?;
            write_accounts_csv(&accounts, output)
        }
        Command::Deposit { account, amount } => {
            let transaction = bank.deposit(*account, parse_amount(amount)?)?;
            persist(&bank)?;
            write_transactions_csv(&[transaction], output)
        }
        Command::Withdraw { account, amount } => {
            let transaction = bank.withdraw(*account, parse_amount(amount)?)?;
            persist(&bank)?;
            write_transactions_csv(&[transaction], output)
        }
        Command::Balance { account } => write_balance_csv(&bank.statement(*account)?, output),
        Command::History { account } => write_transactions_csv(&bank.history(*account)?, output),
        Command::Batch { input, mode, .. } => {
            let config = args.command.batch_config().unwrap_or_default();
            let outcomes = batch::process_file(input, &bank, *mode, &config)?;
            persist(&bank)?;
            write_outcomes_csv(&outcomes, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn invoke(dir: &TempDir, argv: &[&str]) -> Result<String, LedgerError> {
        let data_dir = dir.path().to_str().unwrap();
        let mut full = vec!["bank-ledger", "--data-dir", data_dir];
        full.extend_from_slice(argv);

        let args = CliArgs::try_parse_from(full).unwrap();
        let mut output = Vec::new();
        run(args, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_state_persists_between_invocations() {
        let dir = tempdir().unwrap();

        let created = invoke(&dir, &["create-account", "--holder", "Alice", "--number", "1001"]).unwrap();
        assert_eq!(created, "id,holder_name,account_number\n1,Alice,1001\n");

        invoke(&dir, &["deposit", "--account", "1", "--amount", "100.00"]).unwrap();
        invoke(&dir, &["withdraw", "--account", "1", "--amount", "40.00"]).unwrap();

        let balance = invoke(&dir, &["balance", "--account", "1"]).unwrap();
        assert_eq!(
            balance,
            "account_id,account_number,account_holder,balance\n1,1001,Alice,60.00\n"
        );

        let history = invoke(&dir, &["history", "--account", "1"]).unwrap();
        assert_eq!(history.lines().count(), 3);
        assert!(history.lines().nth(1).unwrap().starts_with("1,1,credit,100.00,"));
        assert!(history.lines().nth(2).unwrap().starts_with("2,1,debit,40.00,"));
    }

    #[test]
    fn test_failed_withdrawal_changes_nothing() {
        let dir = tempdir().unwrap();
        invoke(&dir, &["create-account", "--holder", "Alice", "--number", "1001"]).unwrap();
        invoke(&dir, &["deposit", "--account", "1", "--amount", "100.00"]).unwrap();

        let err = invoke(&dir, &["withdraw", "--account", "1", "--amount", "150.00"]).unwrap_err();
        assert_eq!(err.exit_code(), 6);

        let history = invoke(&dir, &["history", "--account", "1"]).unwrap();
        assert_eq!(history.lines().count(), 2);
    }

    #[test]
    fn test_errors_map_to_distinct_exit_codes() {
        let dir = tempdir().unwrap();
        invoke(&dir, &["create-account", "--holder", "Alice", "--number", "1001"]).unwrap();

        let cases: Vec<(&[&str], u8)> = vec![
            (&["search"], 2),
            (&["create-account", "--holder", "Bob", "--number", "1001"], 3),
            (&["balance", "--account", "9"], 4),
            (&["deposit", "--account", "1", "--amount", "-1"], 5),
            (&["withdraw", "--account", "1", "--amount", "1"], 6),
        ];
        for (argv, expected) in cases {
            let err = invoke(&dir, argv).unwrap_err();
            assert_eq!(err.exit_code(), expected, "for {:?}", argv);
        }
    }

    #[test]
    fn test_search_output() {
        let dir = tempdir().unwrap();
        invoke(&dir, &["create-account", "--holder", "Alice Smith", "--number", "1001"]).unwrap();
        invoke(&dir, &["create-account", "--holder", "Bob", "--number", "1002"]).unwrap();

        let found = invoke(&dir, &["search", "--name", "Smith"]).unwrap();
        assert_eq!(found, "id,holder_name,account_number\n1,Alice Smith,1001\n");

        let none = invoke(&dir, &["search", "--number", "9999"]).unwrap();
        assert_eq!(none, "id,holder_name,account_number\n");
    }
}
