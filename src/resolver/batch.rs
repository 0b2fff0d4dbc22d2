//! Batch icon resolution
//!
//! Resolves many records at once, as during a bookmark import:
//! - records with a blank URL are skipped untouched
//! - every other record gets one resolution, admitted through a semaphore
//! - each resolution writes only its own record's icon slot
//!
//! All resolutions run as futures joined in the calling task. Nothing is
//! spawned, so dropping or cancelling the batch stops every resolution.

use crate::resolver::cascade::FaviconResolver;
use futures::stream::{self, StreamExt};
use std::pin::pin;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// A record whose icon the batch resolver fills in
pub trait IconTarget {
    /// The URL to resolve
    fn url(&self) -> &str;

    /// Stores the outcome: a data URI, or an empty string on failure
    fn set_icon(&mut self, icon: String);
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records that received an icon
    pub resolved: usize,
    /// Records whose resolution failed (icon set to empty)
    pub failed: usize,
    /// Records skipped for having no URL
    pub skipped: usize,
    /// True if the batch was cancelled before every record settled; the
    /// counts then cover only the settled records
    pub cancelled: bool,
}

impl BatchReport {
    /// Number of records that were attempted
    pub fn attempted(&self) -> usize {
        self.resolved + self.failed
    }
}

impl FaviconResolver {
    /// Resolves icons for every record, at most `max-concurrent-resolutions`
    /// at a time
    ///
    /// # Arguments
    ///
    /// * `records` - The records to fill in
    ///
    /// # Returns
    ///
    /// Counts of resolved, failed and skipped records, once all have settled
    pub async fn resolve_batch<'r, T, I>(&self, records: I) -> BatchReport
    where
        I: IntoIterator<Item = &'r mut T>,
        T: IconTarget + Send + 'r,
    {
        self.run_batch(records, &CancellationToken::new()).await
    }

    /// Like [`resolve_batch`](Self::resolve_batch), but stops as soon as the
    /// token is cancelled
    ///
    /// In-flight resolutions are dropped on cancellation. Records that had
    /// not settled keep whatever icon they had before the call; the report
    /// counts only the records that settled before the token fired.
    pub async fn resolve_batch_until<'r, T, I>(
        &self,
        records: I,
        cancel: &CancellationToken,
    ) -> BatchReport
    where
        I: IntoIterator<Item = &'r mut T>,
        T: IconTarget + Send + 'r,
    {
        self.run_batch(records, cancel).await
    }

    async fn run_batch<'r, T, I>(&self, records: I, cancel: &CancellationToken) -> BatchReport
    where
        I: IntoIterator<Item = &'r mut T>,
        T: IconTarget + Send + 'r,
    {
        let mut report = BatchReport::default();

        let pending: Vec<&mut T> = records
            .into_iter()
            .filter(|record| {
                let blank = record.url().trim().is_empty();
                if blank {
                    report.skipped += 1;
                }
                !blank
            })
            .collect();

        if pending.is_empty() {
            return report;
        }

        let limit = self.config().max_concurrent_resolutions.max(1);
        let semaphore = Semaphore::new(limit);
        let in_batch = pending.len();
        tracing::info!(
            "Resolving icons for {} records ({} at a time)",
            in_batch,
            limit
        );

        let mut outcomes = pin!(stream::iter(pending)
            .map(|record| {
                let semaphore = &semaphore;
                async move {
                    let Ok(_permit) = semaphore.acquire().await else {
                        return false;
                    };

                    match self.resolve_favicon(record.url()).await {
                        Ok(data_uri) => {
                            record.set_icon(data_uri);
                            true
                        }
                        Err(e) => {
                            tracing::debug!("Batch record failed: {}", e);
                            record.set_icon(String::new());
                            false
                        }
                    }
                }
            })
            .buffer_unordered(in_batch));

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                outcome = outcomes.next() => outcome,
            };

            match outcome {
                Some(true) => report.resolved += 1,
                Some(false) => report.failed += 1,
                None => break,
            }
        }

        if report.cancelled {
            tracing::warn!(
                "Batch icon resolution cancelled after {} of {} records",
                report.attempted(),
                in_batch
            );
        } else {
            tracing::info!(
                "Batch finished: {} resolved, {} failed, {} skipped",
                report.resolved,
                report.failed,
                report.skipped
            );
        }
        report
    }
}
