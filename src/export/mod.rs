//! Export engine
//!
//! Drives the whole export: one pagination loop per registered provider,
//! fanned out concurrently and joined before the final total is reported.
//!
//! # Overview
//!
//! For each provider the engine runs a strictly sequential cursor loop:
//! fetch a page (through the retry-forever wrapper), append its records to
//! the shared report in page order, bump the progress counter per record,
//! then follow the returned continuation. A page without a continuation
//! ends that provider's loop. Distinct providers share nothing but the
//! report and the counter, both safe under concurrent use.
//!
//! The engine surfaces no provider errors: transient failures are retried
//! forever with capped linear backoff, and permanently invalid records are
//! the provider's job to skip. A source that never recovers keeps its task
//! (and therefore [`Exporter::run`]) alive until the process is killed or
//! the shutdown hook fires.

mod progress;
mod retry;

pub use progress::{ProgressCounter, DEFAULT_PROGRESS_INTERVAL};
pub use retry::{Retrier, RetryPolicy};

use crate::error::{Error, Result};
use crate::provider::{Continuation, HistoryProvider};
use crate::report::Report;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Orchestrates the concurrent export of all registered providers
pub struct Exporter {
    report: Arc<Report>,
    progress: Arc<ProgressCounter>,
    policy: RetryPolicy,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Exporter {
    /// Create an exporter writing into the given report
    pub fn new(report: Arc<Report>) -> Self {
        Self {
            report,
            progress: Arc::new(ProgressCounter::new()),
            policy: RetryPolicy::default(),
            shutdown: None,
        }
    }

    /// Override the retry backoff policy
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the progress reporting interval
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress = Arc::new(ProgressCounter::with_interval(interval));
        self
    }

    /// Attach a shutdown signal.
    ///
    /// Checked at every retry delay; without it the engine has no deadline
    /// of its own and a stuck source blocks completion indefinitely.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// The running total, readable while an export is in flight
    pub fn total(&self) -> u64 {
        self.progress.total()
    }

    /// Export every provider to completion and return the grand total.
    ///
    /// Spawns one task per provider and blocks until all of them have
    /// exhausted their cursors. An empty provider set completes
    /// immediately with a total of zero.
    pub async fn run(&self, providers: Vec<Arc<dyn HistoryProvider>>) -> Result<u64> {
        info!(sources = providers.len(), "exporting transactions");

        let mut tasks = JoinSet::new();
        for provider in providers {
            let report = Arc::clone(&self.report);
            let progress = Arc::clone(&self.progress);
            let mut retrier = Retrier::new(self.policy.clone());
            if let Some(ref shutdown) = self.shutdown {
                retrier = retrier.with_shutdown(shutdown.clone());
            }
            tasks.spawn(drive_provider(provider, report, progress, retrier));
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| Error::Other(format!("provider task panicked: {e}")))??;
        }

        let total = self.progress.total();
        info!(total, "export done");
        Ok(total)
    }
}

/// Sequential pagination loop for one provider.
///
/// Two states: fetching while the source keeps returning a continuation,
/// done as soon as a page comes back without one.
async fn drive_provider(
    provider: Arc<dyn HistoryProvider>,
    report: Arc<Report>,
    progress: Arc<ProgressCounter>,
    retrier: Retrier,
) -> Result<()> {
    let mut continuation: Option<Continuation> = None;

    loop {
        let page = retrier
            .run(provider.name(), || {
                let provider = Arc::clone(&provider);
                let continuation = continuation.clone();
                async move { provider.fetch_page(continuation).await }
            })
            .await?;

        for transaction in page.items {
            report.append(transaction);
            progress.record();
        }

        match page.continuation {
            Some(next) => continuation = Some(next),
            None => break,
        }
    }

    debug!(provider = provider.name(), "source exhausted");
    Ok(())
}

#[cfg(test)]
mod tests;
