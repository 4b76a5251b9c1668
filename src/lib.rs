//! # ledger-export
//!
//! Exports a normalized transaction ledger (deposits and withdrawals) by
//! pulling paginated history from several independent sources and merging
//! everything into one CSV report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Exporter                             │
//! │   one pagination loop per provider, fan-out + join,         │
//! │   retry-forever with capped linear backoff                  │
//! └─────────────────────────────────────────────────────────────┘
//!                             │
//! ┌──────────────┬────────────┴─────────────┬──────────────────┐
//! │ btc-deposits │     cash-operations      │     cashouts     │
//! │ indexer API  │     table store API      │  table store API │
//! └──────────────┴──────────────────────────┴──────────────────┘
//!                             │
//!                    Report (shared sink) → CSV
//! ```
//!
//! Every source implements [`provider::HistoryProvider`]: one paginated
//! fetch over an opaque continuation token. The engine owns retries,
//! concurrency, and progress accounting; providers own mapping and
//! validation.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Blockchain registry
pub mod blockchains;

/// Settings file handling
pub mod config;

/// HTTP client with rate limiting
pub mod http;

/// Provider contract: cursors, pages, the `HistoryProvider` trait
pub mod provider;

/// Concrete history providers
pub mod providers;

/// Export engine: orchestrator, retry policy, progress counter
pub mod export;

/// Shared transaction sink and CSV report writer
pub mod report;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use export::{Exporter, RetryPolicy};
pub use provider::{Continuation, HistoryProvider, Page};
pub use report::{Report, Transaction, TransactionType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
