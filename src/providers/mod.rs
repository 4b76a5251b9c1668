//! Concrete history providers
//!
//! Each provider adapts one external system to the [`HistoryProvider`]
//! contract: the QBitNinja-style blockchain indexer for Bitcoin deposits,
//! and two cloud table stores for withdrawal records. Mapping native rows
//! to [`Transaction`]s, address validation, and the decision to skip an
//! uninterpretable record all live here, never in the engine.
//!
//! [`HistoryProvider`]: crate::provider::HistoryProvider
//! [`Transaction`]: crate::report::Transaction

mod btc_deposits;
mod cash_operations;
mod cashouts;
mod wallets;

pub use btc_deposits::BtcDepositsProvider;
pub use cash_operations::CashOperationsProvider;
pub use cashouts::CashoutsProvider;
pub use wallets::{load_deposit_wallets, DepositWallet};

use serde::Deserialize;

/// Number of rows requested per table store page
pub(crate) const TABLE_PAGE_SIZE: &str = "1000";

/// One page of a tabular store query
#[derive(Debug, Deserialize)]
pub(crate) struct TableSegment<T> {
    /// Rows in this segment
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
    /// Raw continuation token, absent on the last segment
    #[serde(default)]
    pub continuation: Option<String>,
}

/// Treat blank strings from table rows as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
