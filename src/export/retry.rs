//! Retry-forever combinator
//!
//! Wraps a single page fetch so that any failure is retried indefinitely
//! with a capped linear backoff. There is deliberately no maximum attempt
//! count: for an offline batch export, bounded staleness beats a partial
//! report, and a permanently broken source is abandoned by killing the
//! process (or firing the shutdown hook).

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// Backoff schedule for retries.
///
/// The delay before retry attempt `i` (1-indexed) is `unit * min(i, cap)`:
/// a linear ramp that flattens at `cap` units. Defaults to seconds with a
/// five second ceiling.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Base delay multiplied by the attempt number
    pub unit: Duration,
    /// Ceiling on the multiplier
    pub cap: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(1),
            cap: 5,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom unit and cap
    pub fn new(unit: Duration, cap: u32) -> Self {
        Self { unit, cap }
    }

    /// Delay before the given retry attempt (1-indexed)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.unit * attempt.min(self.cap)
    }
}

/// Executes an operation until it succeeds, backing off between attempts
#[derive(Debug, Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Retrier {
    /// Create a retrier with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            shutdown: None,
        }
    }

    /// Attach a shutdown signal checked at every backoff delay.
    ///
    /// When the watched value flips to `true`, the retry loop stops and
    /// returns [`Error::Cancelled`] instead of sleeping.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run `op` until it succeeds.
    ///
    /// Every failure is logged at WARN with the source name and retried
    /// after the policy's delay. The only error this returns is
    /// [`Error::Cancelled`], via the optional shutdown hook.
    pub async fn run<T, F, Fut>(&self, source: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    attempt += 1;
                    let delay = self.policy.delay(attempt);
                    warn!(
                        source,
                        attempt,
                        delay_secs = delay.as_secs_f64(),
                        %error,
                        "fetch failed, operation will be retried"
                    );
                    self.backoff(delay).await?;
                }
            }
        }
    }

    /// Sleep for `delay`, aborting early if shutdown fires
    async fn backoff(&self, delay: Duration) -> Result<()> {
        match self.shutdown {
            Some(ref shutdown) => {
                let mut shutdown = shutdown.clone();
                tokio::select! {
                    () = tokio::time::sleep(delay) => Ok(()),
                    _ = shutdown.wait_for(|stop| *stop) => Err(Error::Cancelled),
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}
