//! Deposit wallet source
//!
//! Deposit history is wallet-scoped: the indexer is queried per address.
//! The wallet list comes from a CSV file with `user_id,address,currency`
//! columns; malformed rows are logged and skipped.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// One platform deposit wallet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepositWallet {
    /// Owning platform user
    pub user_id: Uuid,
    /// On-chain address
    pub address: String,
    /// Currency code, e.g. "BTC"
    #[serde(rename = "currency")]
    pub crypto_currency: String,
}

/// Load deposit wallets from a CSV file
pub fn load_deposit_wallets(path: impl AsRef<Path>) -> Result<Vec<DepositWallet>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::wallets(format!("{}: {e}", path.display())))?;

    let mut wallets = Vec::new();
    for (line, row) in reader.deserialize::<DepositWallet>().enumerate() {
        match row {
            Ok(wallet) => wallets.push(wallet),
            Err(error) => {
                // Header is line 1; enumerate starts after it
                warn!(line = line + 2, %error, "skipping malformed deposit wallet row");
            }
        }
    }

    info!(count = wallets.len(), path = %path.display(), "deposit wallets loaded");
    Ok(wallets)
}
