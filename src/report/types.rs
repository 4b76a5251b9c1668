//! Report types
//!
//! The normalized transaction shape shared by every history provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a transaction relative to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Funds received by a platform wallet
    Deposit,
    /// Funds sent out to an external address
    Withdrawal,
}

impl TransactionType {
    /// Report column value for this transaction type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "received",
            Self::Withdrawal => "sent",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized transaction, the unit of the exported ledger.
///
/// Immutable once built; the engine only forwards these from providers to
/// the report. Hashes are source-specific and treated as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Crypto currency code, e.g. "BTC"
    pub crypto_currency: String,
    /// Transaction hash or id in the source chain's native format
    pub hash: String,
    /// Stable platform user id
    pub user_id: Uuid,
    /// Counterparty address
    pub address: String,
    /// Deposit or withdrawal
    pub transaction_type: TransactionType,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        crypto_currency: impl Into<String>,
        hash: impl Into<String>,
        user_id: Uuid,
        address: impl Into<String>,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            crypto_currency: crypto_currency.into(),
            hash: hash.into(),
            user_id,
            address: address.into(),
            transaction_type,
        }
    }

    /// Shorthand for a deposit
    pub fn deposit(
        crypto_currency: impl Into<String>,
        hash: impl Into<String>,
        user_id: Uuid,
        address: impl Into<String>,
    ) -> Self {
        Self::new(crypto_currency, hash, user_id, address, TransactionType::Deposit)
    }

    /// Shorthand for a withdrawal
    pub fn withdrawal(
        crypto_currency: impl Into<String>,
        hash: impl Into<String>,
        user_id: Uuid,
        address: impl Into<String>,
    ) -> Self {
        Self::new(
            crypto_currency,
            hash,
            user_id,
            address,
            TransactionType::Withdrawal,
        )
    }
}
