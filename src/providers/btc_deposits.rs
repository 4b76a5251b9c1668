//! Bitcoin deposits provider
//!
//! Queries a QBitNinja-style balance endpoint for each configured deposit
//! wallet. A balance operation that spends no coins is a deposit into the
//! wallet; everything else is change or an outgoing spend and is ignored.
//!
//! The provider walks all wallets through a single cursor sequence: its
//! continuation token encodes the wallet index plus the indexer's own
//! inner token, so the engine sees one ordinary paginated source.

use super::wallets::DepositWallet;
use crate::blockchains::{Blockchain, Blockchains};
use crate::error::Result;
use crate::http::HttpClient;
use crate::provider::{Continuation, HistoryProvider, Page};
use crate::report::Transaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cursor state: which wallet, and where inside its history
#[derive(Debug, Serialize, Deserialize)]
struct WalletCursor {
    wallet: usize,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    #[serde(default)]
    operations: Vec<BalanceOperation>,
    #[serde(default)]
    continuation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceOperation {
    transaction_id: String,
    #[serde(default)]
    spent_coins: Vec<serde_json::Value>,
}

impl BalanceOperation {
    /// No spent inputs means the operation only received coins
    fn is_deposit(&self) -> bool {
        self.spent_coins.is_empty()
    }
}

/// Deposit history from the Bitcoin indexer
pub struct BtcDepositsProvider {
    client: HttpClient,
    bitcoin: Blockchain,
    wallets: Vec<DepositWallet>,
}

impl BtcDepositsProvider {
    /// Create a provider over the Bitcoin wallets in `wallets`.
    ///
    /// Wallets for other currencies are filtered out here; this provider
    /// can only serve Bitcoin history.
    pub fn new(client: HttpClient, blockchains: &Blockchains, wallets: Vec<DepositWallet>) -> Self {
        let bitcoin = blockchains.bitcoin().clone();
        let wallets = wallets
            .into_iter()
            .filter(|w| w.crypto_currency == bitcoin.crypto_currency)
            .collect();
        Self {
            client,
            bitcoin,
            wallets,
        }
    }

    /// Cursor pointing at the start of the wallet after `current`, or
    /// `None` when `current` was the last one
    fn next_wallet(&self, current: usize) -> Result<Option<Continuation>> {
        let next = current + 1;
        if next < self.wallets.len() {
            Ok(Some(Continuation::encode(&WalletCursor {
                wallet: next,
                token: None,
            })?))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl HistoryProvider for BtcDepositsProvider {
    fn name(&self) -> &str {
        "btc-deposits"
    }

    async fn fetch_page(&self, continuation: Option<Continuation>) -> Result<Page> {
        let cursor = match continuation {
            Some(token) => token.decode::<WalletCursor>()?,
            None => WalletCursor {
                wallet: 0,
                token: None,
            },
        };

        let Some(wallet) = self.wallets.get(cursor.wallet) else {
            return Ok(Page::empty());
        };

        if !is_valid_bitcoin_address(&wallet.address) {
            warn!(
                address = %wallet.address,
                "not a valid Bitcoin address, skipping wallet"
            );
            return Ok(Page::new(Vec::new(), self.next_wallet(cursor.wallet)?));
        }

        let response: BalanceResponse = self
            .client
            .get_json(
                &format!("balances/{}", wallet.address),
                &[
                    ("colored", "true"),
                    ("continuation", cursor.token.as_deref().unwrap_or("")),
                ],
            )
            .await?;

        let items = response
            .operations
            .iter()
            .filter(|op| op.is_deposit())
            .map(|op| {
                Transaction::deposit(
                    &self.bitcoin.crypto_currency,
                    &op.transaction_id,
                    wallet.user_id,
                    &wallet.address,
                )
            })
            .collect();

        let next = match response.continuation {
            Some(token) => Some(Continuation::encode(&WalletCursor {
                wallet: cursor.wallet,
                token: Some(token),
            })?),
            None => self.next_wallet(cursor.wallet)?,
        };

        Ok(Page::new(items, next))
    }
}

/// Structural check for mainnet Bitcoin addresses.
///
/// Good enough to reject garbage before it hits the indexer; the indexer
/// itself is the authority on anything that passes.
fn is_valid_bitcoin_address(address: &str) -> bool {
    const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

    if (address.starts_with('1') || address.starts_with('3'))
        && (26..=35).contains(&address.len())
    {
        return address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() && !"0OIl".contains(c));
    }

    if let Some(data) = address.strip_prefix("bc1") {
        return (14..=74).contains(&address.len()) && data.chars().all(|c| BECH32_CHARSET.contains(c));
    }

    false
}

#[cfg(test)]
mod address_tests {
    use super::is_valid_bitcoin_address;

    #[test]
    fn test_accepts_common_address_forms() {
        assert!(is_valid_bitcoin_address("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
        assert!(is_valid_bitcoin_address("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"));
        assert!(is_valid_bitcoin_address(
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq"
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_bitcoin_address(""));
        assert!(!is_valid_bitcoin_address("not-an-address"));
        // Base58 forbids 0, O, I and l
        assert!(!is_valid_bitcoin_address("10oatSLRHtKNngkdXEeobR76b53LETtpyT"));
        assert!(!is_valid_bitcoin_address("bc1QUPPERCASE"));
        assert!(!is_valid_bitcoin_address("0x52908400098527886E0F7030069857D2E4169EE7"));
    }
}
