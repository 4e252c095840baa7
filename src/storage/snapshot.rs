//! CSV snapshots of a complete store
//!
//! A snapshot directory holds two files:
//!
//! ```text
//! accounts.csv      id,holder_name,account_number
//! transactions.csv  id,account_id,kind,amount,timestamp
//! ```
//!
//! Files are written to a temporary sibling first and renamed into place, so
//! an interrupted save leaves the previous snapshot intact. A missing
//! directory or file loads as an empty store.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, Trim, Writer};
use tracing::{debug, info};

use super::memory::{InMemoryAccountStorage, InMemoryLedgerStorage};
use super::{AccountStorage, LedgerStorage};
use crate::types::{Account, AccountFilter, LedgerError, Transaction};

pub const ACCOUNTS_FILE: &str = "accounts.csv";
pub const TRANSACTIONS_FILE: &str = "transactions.csv";

/// In-memory stores restored from disk
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub accounts: Arc<InMemoryAccountStorage>,
    pub ledger: Arc<InMemoryLedgerStorage>,
}

/// Load a snapshot directory into fresh in-memory stores
pub fn load_snapshot(dir: &Path) -> Result<Snapshot, LedgerError> {
    let accounts = InMemoryAccountStorage::new();
    let ledger = InMemoryLedgerStorage::new();

    let accounts_path = dir.join(ACCOUNTS_FILE);
    if accounts_path.exists() {
        for account in read_rows::<Account>(&accounts_path)? {
            accounts.restore(account)?;
        }
    }

    let transactions_path = dir.join(TRANSACTIONS_FILE);
    if transactions_path.exists() {
        let mut rows = read_rows::<Transaction>(&transactions_path)?;
        rows.sort_by_key(|transaction| transaction.id);
        for transaction in rows {
            if accounts.get(transaction.account_id)?.is_none() {
                return Err(LedgerError::internal(format!(
                    "snapshot entry {} references unknown account {}",
                    transaction.id, transaction.account_id
                )));
            }
            ledger.restore(transaction)?;
        }
    }

    debug!(
        dir = %dir.display(),
        accounts = accounts.len(),
        transactions = ledger.len(),
        "snapshot loaded"
    );

    Ok(Snapshot {
        accounts: Arc::new(accounts),
        ledger: Arc::new(ledger),
    })
}

/// Write every account and entry to `dir`, creating it when needed
pub fn save_snapshot(
    dir: &Path,
    accounts: &dyn AccountStorage,
    ledger: &dyn LedgerStorage,
) -> Result<(), LedgerError> {
    fs::create_dir_all(dir)?;

    let account_rows = accounts.scan(&AccountFilter::all())?;
    let transaction_rows = ledger.all_entries()?;

    write_rows(&dir.join(ACCOUNTS_FILE), &account_rows)?;
    write_rows(&dir.join(TRANSACTIONS_FILE), &transaction_rows)?;

    info!(
        dir = %dir.display(),
        accounts = account_rows.len(),
        transactions = transaction_rows.len(),
        "snapshot saved"
    );
    Ok(())
}

fn read_rows<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, LedgerError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    reader
        .deserialize::<T>()
        .map(|row| row.map_err(LedgerError::from))
        .collect()
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<(), LedgerError> {
    let tmp_path = temp_path(path);
    {
        let file = File::create(&tmp_path)?;
        let mut writer = Writer::from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
