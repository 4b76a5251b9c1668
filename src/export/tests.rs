//! Tests for the export engine

use super::*;
use crate::error::Error;
use crate::provider::Page;
use crate::report::Transaction;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use test_case::test_case;
use uuid::Uuid;

// ============================================================================
// RetryPolicy Tests
// ============================================================================

#[test_case(1, 1; "first retry waits one second")]
#[test_case(3, 3; "ramp is linear")]
#[test_case(5, 5; "cap boundary")]
#[test_case(6, 5; "capped after five")]
#[test_case(100, 5; "stays capped")]
fn test_retry_policy_delay(attempt: u32, expected_secs: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.delay(attempt), Duration::from_secs(expected_secs));
}

#[test]
fn test_retry_policy_custom_unit() {
    let policy = RetryPolicy::new(Duration::from_millis(10), 3);
    assert_eq!(policy.delay(2), Duration::from_millis(20));
    assert_eq!(policy.delay(9), Duration::from_millis(30));
}

// ============================================================================
// ProgressCounter Tests
// ============================================================================

#[test]
fn test_progress_counter_returns_post_increment_total() {
    let counter = ProgressCounter::new();
    assert_eq!(counter.record(), 1);
    assert_eq!(counter.record(), 2);
    assert_eq!(counter.total(), 2);
}

#[tokio::test]
async fn test_progress_counter_totals_are_unique_under_concurrency() {
    // Every recorded value must be seen by exactly one caller, which is
    // what makes each progress milestone fire exactly once.
    let counter = Arc::new(ProgressCounter::with_interval(10));
    let seen = Arc::new(Mutex::new(HashSet::new()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let counter = Arc::clone(&counter);
        let seen = Arc::clone(&seen);
        handles.push(tokio::spawn(async move {
            for _ in 0..250 {
                let total = counter.record();
                assert!(seen.lock().unwrap().insert(total), "duplicate total {total}");
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(counter.total(), 2000);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2000);
    assert!((1..=2000).all(|n| seen.contains(&n)));
}

// ============================================================================
// Scripted provider
// ============================================================================

fn tx(id: &str) -> Transaction {
    Transaction::withdrawal("BTC", id, Uuid::nil(), "addr")
}

fn page(count: usize, token: Option<&str>) -> Page {
    let items = (0..count).map(|i| tx(&format!("{token:?}-{i}"))).collect();
    Page::from_token(items, token.map(ToString::to_string))
}

/// Provider that replays a fixed sequence of results and records the
/// continuation it was called with each time.
struct ScriptedProvider {
    name: String,
    script: Mutex<VecDeque<crate::error::Result<Page>>>,
    calls: Mutex<Vec<Option<String>>>,
}

impl ScriptedProvider {
    fn new(name: &str, script: Vec<crate::error::Result<Page>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_page(&self, continuation: Option<Continuation>) -> crate::error::Result<Page> {
        self.calls
            .lock()
            .unwrap()
            .push(continuation.map(Continuation::into_inner));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider called after its script ended")
    }
}

fn exporter_with(report: &Arc<Report>) -> Exporter {
    // Millisecond-scale backoff keeps non-paused tests fast
    Exporter::new(Arc::clone(report)).with_policy(RetryPolicy::new(Duration::from_millis(1), 5))
}

fn as_providers(providers: &[Arc<ScriptedProvider>]) -> Vec<Arc<dyn HistoryProvider>> {
    providers
        .iter()
        .map(|p| Arc::clone(p) as Arc<dyn HistoryProvider>)
        .collect()
}

// ============================================================================
// Pagination Driver Tests
// ============================================================================

#[tokio::test]
async fn test_driver_follows_cursor_sequence_and_terminates() {
    let provider = ScriptedProvider::new(
        "scripted",
        vec![
            Ok(page(1, Some("A"))),
            Ok(page(1, Some("B"))),
            Ok(page(1, None)),
        ],
    );
    let report = Arc::new(Report::new());

    let total = exporter_with(&report)
        .run(as_providers(&[provider.clone()]))
        .await
        .unwrap();

    assert_eq!(total, 3);
    assert_eq!(
        provider.calls(),
        vec![None, Some("A".to_string()), Some("B".to_string())]
    );
}

#[tokio::test]
async fn test_driver_retries_with_the_same_cursor() {
    let provider = ScriptedProvider::new(
        "flaky",
        vec![
            Ok(page(1, Some("A"))),
            Err(Error::http_status(500, "boom")),
            Ok(page(1, None)),
        ],
    );
    let report = Arc::new(Report::new());

    let total = exporter_with(&report)
        .run(as_providers(&[provider.clone()]))
        .await
        .unwrap();

    assert_eq!(total, 2);
    // The failed fetch of page two is reissued with cursor A, not reset
    assert_eq!(
        provider.calls(),
        vec![None, Some("A".to_string()), Some("A".to_string())]
    );
}

#[tokio::test]
async fn test_driver_failing_twice_then_empty_terminal_page() {
    let provider = ScriptedProvider::new(
        "flaky",
        vec![
            Err(Error::http_status(500, "boom")),
            Err(Error::http_status(429, "slow down")),
            Ok(Page::empty()),
        ],
    );
    let report = Arc::new(Report::new());

    let total = exporter_with(&report)
        .run(as_providers(&[provider.clone()]))
        .await
        .unwrap();

    assert_eq!(total, 0);
    assert!(report.is_empty());
    assert_eq!(provider.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_backoff_schedule() {
    // Default policy, seven consecutive failures: delays must be
    // 1,2,3,4,5 then flat 5,5 seconds.
    let mut script: Vec<crate::error::Result<Page>> = (0..7)
        .map(|_| Err(Error::http_status(500, "boom")))
        .collect();
    script.push(Ok(Page::empty()));
    let provider = ScriptedProvider::new("flaky", script);
    let report = Arc::new(Report::new());

    let started = tokio::time::Instant::now();
    Exporter::new(Arc::clone(&report))
        .run(as_providers(&[provider.clone()]))
        .await
        .unwrap();

    assert_eq!(provider.calls().len(), 8);
    assert_eq!(
        started.elapsed(),
        Duration::from_secs(1 + 2 + 3 + 4 + 5 + 5 + 5)
    );
}

// ============================================================================
// Orchestrator Tests
// ============================================================================

#[tokio::test]
async fn test_two_concurrent_providers_sum_into_shared_report() {
    let first = ScriptedProvider::new(
        "first",
        vec![
            Ok(page(2, Some("A"))),
            Ok(page(2, Some("B"))),
            Ok(page(2, None)),
        ],
    );
    let second = ScriptedProvider::new(
        "second",
        vec![
            Ok(page(2, Some("X"))),
            Ok(page(2, Some("Y"))),
            Ok(page(2, None)),
        ],
    );
    let report = Arc::new(Report::new());

    let total = exporter_with(&report)
        .run(as_providers(&[first.clone(), second.clone()]))
        .await
        .unwrap();

    // run returned, so both loops reached their terminal page
    assert_eq!(total, 12);
    assert_eq!(report.len(), 12);
    assert_eq!(first.calls().len(), 3);
    assert_eq!(second.calls().len(), 3);
}

#[tokio::test]
async fn test_empty_provider_set_completes_immediately() {
    let report = Arc::new(Report::new());
    let exporter = exporter_with(&report);

    let total = exporter.run(Vec::new()).await.unwrap();

    assert_eq!(total, 0);
    assert_eq!(exporter.total(), 0);
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_shutdown_breaks_the_retry_loop() {
    // Without the shutdown hook this provider would be retried forever.
    let provider = ScriptedProvider::new(
        "stuck",
        vec![Err(Error::http_status(500, "permanently broken"))],
    );
    let report = Arc::new(Report::new());

    let (stop, stop_rx) = tokio::sync::watch::channel(false);
    stop.send(true).unwrap();

    let err = Exporter::new(Arc::clone(&report))
        .with_shutdown(stop_rx)
        .run(as_providers(&[provider]))
        .await
        .unwrap_err();

    assert!(err.is_cancellation());
}

#[tokio::test]
async fn test_total_equals_sum_of_page_sizes_across_interleavings() {
    let mut providers: Vec<Arc<dyn HistoryProvider>> = Vec::new();
    for i in 0..5 {
        providers.push(ScriptedProvider::new(
            &format!("source-{i}"),
            vec![
                Ok(page(3, Some("t1"))),
                Ok(page(0, Some("t2"))),
                Ok(page(4, None)),
            ],
        ));
    }
    let report = Arc::new(Report::new());

    let total = exporter_with(&report).run(providers).await.unwrap();

    assert_eq!(total, 5 * 7);
    assert_eq!(report.len() as u64, total);
}
