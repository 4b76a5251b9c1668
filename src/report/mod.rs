//! Transaction report
//!
//! The shared sink that every provider task appends into, plus the CSV
//! writer that serializes the collected ledger once the export is done.
//!
//! # Overview
//!
//! `Report` is cheap to share behind an `Arc` and safe under concurrent
//! appends. Records from one page land in page order; interleaving across
//! providers is unspecified. Deduplication happens at write time only; the
//! engine never inspects or collapses what providers hand it.

mod types;

pub use types::{Transaction, TransactionType};

use crate::error::Result;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Shared accumulator for normalized transactions
#[derive(Debug, Default)]
pub struct Report {
    transactions: Mutex<Vec<Transaction>>,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one transaction.
    ///
    /// Safe to call from any number of concurrent provider tasks.
    pub fn append(&self, transaction: Transaction) {
        let mut transactions = self.transactions.lock().expect("report lock poisoned");
        transactions.push(transaction);
    }

    /// Number of transactions collected so far
    pub fn len(&self) -> usize {
        self.transactions.lock().expect("report lock poisoned").len()
    }

    /// Check if the report is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone out the collected transactions, in append order
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions
            .lock()
            .expect("report lock poisoned")
            .clone()
    }

    /// Write the report as CSV to the given path.
    ///
    /// Columns: `user_id,transaction_hash,crypto_currency,address,
    /// transaction_type`. Rows are written in first-seen order with exact
    /// duplicates collapsed. Returns the number of rows written.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        let transactions = self.snapshot();
        let mut writer = csv::Writer::from_path(path.as_ref())?;

        writer.write_record([
            "user_id",
            "transaction_hash",
            "crypto_currency",
            "address",
            "transaction_type",
        ])?;

        let mut seen = HashSet::new();
        let mut written = 0usize;
        for tx in &transactions {
            if !seen.insert(tx.clone()) {
                continue;
            }
            writer.write_record([
                tx.user_id.to_string().as_str(),
                tx.hash.as_str(),
                tx.crypto_currency.as_str(),
                tx.address.as_str(),
                tx.transaction_type.as_str(),
            ])?;
            written += 1;
        }

        writer.flush().map_err(crate::error::Error::Io)?;

        info!(
            rows = written,
            collected = transactions.len(),
            path = %path.as_ref().display(),
            "report saved"
        );

        Ok(written)
    }
}

#[cfg(test)]
mod tests;
