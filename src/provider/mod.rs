//! Provider contract
//!
//! Every record source (a blockchain indexer, a cloud table) plugs into
//! the export engine through [`HistoryProvider`]: a single paginated fetch
//! operation over an opaque continuation token.
//!
//! # Contract
//!
//! - The first call passes `None`; later calls pass exactly the token the
//!   previous page returned. Tokens are never shared across providers.
//! - Providers map their native records to [`Transaction`]s and skip
//!   anything they cannot interpret; a skipped record is not an error.
//! - Providers never retry internally. Any failure is returned as-is and
//!   the engine's retry policy takes over.
//!
//! [`Transaction`]: crate::report::Transaction

mod types;

pub use types::{Continuation, Page};

use crate::error::Result;
use async_trait::async_trait;

/// A pluggable source of transaction history
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Name used in logs and diagnostics only
    fn name(&self) -> &str;

    /// Fetch the next page of history.
    ///
    /// `continuation` is `None` to start from the beginning, otherwise a
    /// token previously returned by this same provider.
    async fn fetch_page(&self, continuation: Option<Continuation>) -> Result<Page>;
}

impl std::fmt::Debug for dyn HistoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryProvider")
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests;
