//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (request conversion, output serialization)
//! - `async_reader` - Asynchronous request reader with batch reading interface

pub mod async_reader;
pub mod csv_format;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_request_record, write_accounts_csv, write_balance_csv, write_outcomes_csv,
    write_transactions_csv, RequestRecord,
};
