//! Asynchronous CSV reader with batch interface
//!
//! Reads batch request files in fixed-size chunks so a large file never has
//! to be held in memory at once.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of RequestLines
//!                  ↓
//!           csv_format module
//!           (RequestRecord, convert_request_record)
//! ```
//!
//! Every data row yields exactly one `RequestLine`, numbered from 1 in file
//! order. Rows that fail to parse carry their error instead of being
//! dropped, so the caller can report them.

use crate::batch::RequestLine;
use crate::io::csv_format::{convert_request_record, RequestRecord};
use crate::types::LedgerError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    last_seq: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            last_seq: 0,
        }
    }

    /// Read up to `batch_size` request lines
    ///
    /// Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<RequestLine> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<RequestRecord>();

        while batch.len() < batch_size {
            let line = match records.next().await {
                Some(Ok(record)) => {
                    self.last_seq += 1;
                    let op = record.op.trim().to_lowercase();
                    RequestLine {
                        seq: self.last_seq,
                        op,
                        request: convert_request_record(record),
                    }
                }
                Some(Err(e)) => {
                    self.last_seq += 1;
                    warn!(seq = self.last_seq, error = %e, "unreadable request row");
                    RequestLine {
                        seq: self.last_seq,
                        op: String::new(),
                        request: Err(LedgerError::invalid_input(format!(
                            "unreadable row: {}",
                            e
                        ))),
                    }
                }
                None => break,
            };
            batch.push(line);
        }

        batch
    }
}
