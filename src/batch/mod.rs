//! Batch request processing
//!
//! Reads a CSV file of requests and runs them against a [`Bank`], the way a
//! service front end would feed independent callers into the core.
//!
//! # Architecture
//!
//! ```text
//! process_file
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (sequential or task-per-request execution)
//!         └── Bank
//! ```
//!
//! Batches are read and executed one after another; the mode only decides
//! how requests inside a batch are scheduled.

use std::path::Path;

use futures::io::AsyncRead;
use tracing::{info, warn};

use crate::cli::ProcessingMode;
use crate::core::Bank;
use crate::io::AsyncReader;
use crate::types::LedgerError;

pub mod processor;
pub mod request;

pub use processor::BatchProcessor;
pub use request::{Outcome, Reply, Request, RequestLine};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of requests read per batch
    pub batch_size: usize,
    /// Maximum number of requests executing at once (concurrent mode)
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                max_concurrent,
                default = default.max_concurrent,
                "invalid max_concurrent, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Drain `reader` batch by batch through `processor`
pub async fn run_batches<R>(
    mut reader: AsyncReader<R>,
    processor: &BatchProcessor,
    mode: ProcessingMode,
    config: &BatchConfig,
) -> Vec<Outcome>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut outcomes = Vec::new();

    loop {
        let batch = reader.read_batch(config.batch_size).await;
        if batch.is_empty() {
            break;
        }

        let results = match mode {
            ProcessingMode::Sequential => processor.process_sequential(batch).await,
            ProcessingMode::Concurrent => {
                processor
                    .process_concurrent(batch, config.max_concurrent)
                    .await
            }
        };
        outcomes.extend(results);
    }

    outcomes
}

/// Process a request file against `bank`
///
/// Builds a multi-threaded tokio runtime sized by `config.max_concurrent`.
/// Only fatal problems (runtime creation, opening the file) are returned as
/// errors; failed requests are reported in the outcomes.
pub fn process_file(
    input_path: &Path,
    bank: &Bank,
    mode: ProcessingMode,
    config: &BatchConfig,
) -> Result<Vec<Outcome>, LedgerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.max_concurrent.max(1))
        .build()
        .map_err(|e| LedgerError::internal(format!("failed to create tokio runtime: {}", e)))?;

    let processor = BatchProcessor::new(bank.clone());

    let outcomes = runtime.block_on(async {
        let file = tokio::fs::File::open(input_path).await.map_err(|e| {
            LedgerError::internal(format!(
                "failed to open file '{}': {}",
                input_path.display(),
                e
            ))
        })?;

        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let reader = AsyncReader::new(compat_file);

        Ok::<_, LedgerError>(run_batches(reader, &processor, mode, config).await)
    })?;

    let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
    info!(
        input = %input_path.display(),
        ?mode,
        requests = outcomes.len(),
        failed,
        "batch processed"
    );
    Ok(outcomes)
}
