use board_core::{EnrichmentRecord, DEFAULT_BATCH_SIZE};
use board_logging::{board_debug, board_warn};
use tokio_util::sync::CancellationToken;

use crate::sources::EnrichmentSource;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationOutcome {
    /// Every batch was answered.
    Complete,
    /// A batch failed or came back empty; later batches were not requested.
    Halted(FetchError),
    /// The token fired before a batch was issued.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub records: Vec<EnrichmentRecord>,
    pub batches_issued: usize,
    pub outcome: PaginationOutcome,
}

impl Pagination {
    pub fn is_complete(&self) -> bool {
        self.outcome == PaginationOutcome::Complete
    }
}

/// Resolves enrichment for a URL list in strictly sequential, bounded batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentPaginator {
    batch_size: usize,
}

impl Default for EnrichmentPaginator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl EnrichmentPaginator {
    /// A batch size of zero is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn batch_count(&self, urls: usize) -> usize {
        urls.div_ceil(self.batch_size)
    }

    pub async fn collect(
        &self,
        source: &dyn EnrichmentSource,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Pagination {
        let mut records = Vec::with_capacity(urls.len());
        let mut batches_issued = 0;
        let total = self.batch_count(urls.len());

        for batch in urls.chunks(self.batch_size) {
            if cancel.is_cancelled() {
                board_debug!("pagination cancelled after {}/{} batches", batches_issued, total);
                return Pagination {
                    records,
                    batches_issued,
                    outcome: PaginationOutcome::Cancelled,
                };
            }

            batches_issued += 1;
            let result = source.fetch_batch(batch).await;
            let halt = match result {
                Ok(batch_records) if batch_records.is_empty() => Some(FetchError::new(
                    FailureKind::EmptyResponse,
                    "batch returned no records",
                )),
                Ok(batch_records) => {
                    board_debug!(
                        "batch {}/{}: {} urls, {} records",
                        batches_issued,
                        total,
                        batch.len(),
                        batch_records.len()
                    );
                    records.extend(batch_records);
                    None
                }
                Err(err) => Some(err),
            };

            if let Some(err) = halt {
                board_warn!(
                    "pagination halted at batch {}/{}: {}",
                    batches_issued,
                    total,
                    err
                );
                return Pagination {
                    records,
                    batches_issued,
                    outcome: PaginationOutcome::Halted(err),
                };
            }
        }

        Pagination {
            records,
            batches_issued,
            outcome: PaginationOutcome::Complete,
        }
    }
}
