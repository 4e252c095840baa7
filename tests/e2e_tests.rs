//! End-to-end integration tests
//!
//! These tests run request files through the complete batch pipeline. Each
//! test:
//! 1. Reads input.csv from a fixture directory
//! 2. Executes every request against a fresh in-memory bank
//! 3. Generates the outcome CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path deposits, withdrawals and balances
//! - Rejected withdrawals leaving the ledger untouched
//! - Every error kind a caller can trigger
//! - Account search
//!
//! Fixtures are order-dependent, so they run in sequential mode. Concurrent
//! behavior is covered in concurrency_tests.rs.

#[cfg(test)]
mod tests {
    use bank_ledger::batch::{process_file, BatchConfig};
    use bank_ledger::cli::{run, CliArgs, ProcessingMode};
    use bank_ledger::core::{Bank, CoordinatorConfig};
    use bank_ledger::io::write_outcomes_csv;
    use clap::Parser;
    use rstest::rstest;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// Run a fixture and compare its outcomes with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read or the output differs.
    fn run_test_fixture(fixture_name: &str, batch_size: usize) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let bank = Bank::in_memory(CoordinatorConfig::default());
        let config = BatchConfig::new(batch_size, 2);

        let outcomes = process_file(
            Path::new(&input_path),
            &bank,
            ProcessingMode::Sequential,
            &config,
        )
        .unwrap_or_else(|e| panic!("Failed to process requests: {}", e));

        let mut output = Vec::new();
        write_outcomes_csv(&outcomes, &mut output).expect("Failed to write outcomes");
        let actual_output = String::from_utf8(output).expect("Output is not UTF-8");

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (batch size: {})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, batch_size, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_funds")]
    #[case("invalid_requests")]
    #[case("account_search")]
    fn test_fixtures(#[case] fixture: &str, #[values(1, 3, 1000)] batch_size: usize) {
        run_test_fixture(fixture, batch_size);
    }

    #[test]
    fn test_missing_input_file_is_internal_error() {
        let bank = Bank::in_memory(CoordinatorConfig::default());
        let err = process_file(
            Path::new("tests/fixtures/does_not_exist.csv"),
            &bank,
            ProcessingMode::Sequential,
            &BatchConfig::default(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), "internal_error");
    }

    /// The batch command persists its effects for later invocations
    #[test]
    fn test_batch_command_persists_snapshot() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap().to_string();

        let invoke = |argv: &[&str]| {
            let mut full = vec!["bank-ledger", "--data-dir", data_dir.as_str()];
            full.extend_from_slice(argv);
            let mut output = Vec::new();
            run(CliArgs::try_parse_from(full).unwrap(), &mut output).unwrap();
            String::from_utf8(output).unwrap()
        };

        let outcomes = invoke(&["batch", "tests/fixtures/happy_path/input.csv"]);
        let expected = fs::read_to_string("tests/fixtures/happy_path/expected.csv").unwrap();
        assert_eq!(outcomes, expected);

        let balance = invoke(&["balance", "--account", "1"]);
        assert_eq!(
            balance,
            "account_id,account_number,account_holder,balance\n1,1001,Alice Smith,60.00\n"
        );

        let history = invoke(&["history", "--account", "2"]);
        assert_eq!(history.lines().count(), 2);
    }
}
