//! Tests for the report module

use super::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use uuid::Uuid;

fn tx(hash: &str) -> Transaction {
    Transaction::withdrawal("BTC", hash, Uuid::nil(), "1BoatSLRHtKNngkdXEeobR76b53LETtpyT")
}

// ============================================================================
// TransactionType Tests
// ============================================================================

#[test]
fn test_transaction_type_column_values() {
    assert_eq!(TransactionType::Deposit.as_str(), "received");
    assert_eq!(TransactionType::Withdrawal.as_str(), "sent");
    assert_eq!(TransactionType::Deposit.to_string(), "received");
}

#[test]
fn test_transaction_shorthands() {
    let user = Uuid::new_v4();
    let deposit = Transaction::deposit("BTC", "abc", user, "addr");
    assert_eq!(deposit.transaction_type, TransactionType::Deposit);

    let withdrawal = Transaction::withdrawal("ETH", "def", user, "addr");
    assert_eq!(withdrawal.transaction_type, TransactionType::Withdrawal);
    assert_eq!(withdrawal.crypto_currency, "ETH");
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_report_append_and_len() {
    let report = Report::new();
    assert!(report.is_empty());

    report.append(tx("a"));
    report.append(tx("b"));

    assert_eq!(report.len(), 2);
    let snapshot = report.snapshot();
    assert_eq!(snapshot[0].hash, "a");
    assert_eq!(snapshot[1].hash, "b");
}

#[tokio::test]
async fn test_report_concurrent_appends() {
    let report = Arc::new(Report::new());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let report = Arc::clone(&report);
        handles.push(tokio::spawn(async move {
            for i in 0..100 {
                report.append(tx(&format!("{worker}-{i}")));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(report.len(), 800);
}

#[test]
fn test_report_save_csv() {
    let report = Report::new();
    let user = Uuid::new_v4();
    report.append(Transaction::deposit("BTC", "hash-1", user, "addr-1"));
    report.append(Transaction::withdrawal("ETH", "hash-2", user, "addr-2"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let written = report.save_csv(&path).unwrap();
    assert_eq!(written, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "user_id,transaction_hash,crypto_currency,address,transaction_type"
    );
    assert_eq!(
        lines.next().unwrap(),
        format!("{user},hash-1,BTC,addr-1,received")
    );
    assert_eq!(
        lines.next().unwrap(),
        format!("{user},hash-2,ETH,addr-2,sent")
    );
    assert!(lines.next().is_none());
}

#[test]
fn test_report_save_csv_collapses_duplicates() {
    let report = Report::new();
    report.append(tx("same"));
    report.append(tx("same"));
    report.append(tx("other"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    let written = report.save_csv(&path).unwrap();

    // Both appends are kept in the sink; only the writer collapses them
    assert_eq!(report.len(), 3);
    assert_eq!(written, 2);
}
