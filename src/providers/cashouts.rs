//! Cashout withdrawals provider
//!
//! Reads the cashout processor's `Cashout` table. Only cashouts that
//! completed successfully and made it on-chain are exported; the
//! blockchain is resolved through its integration-layer id.

use super::{non_blank, TableSegment, TABLE_PAGE_SIZE};
use crate::blockchains::Blockchains;
use crate::error::Result;
use crate::http::HttpClient;
use crate::provider::{Continuation, HistoryProvider, Page};
use crate::report::Transaction;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Default table holding processed cashouts
pub const CASHOUTS_TABLE: &str = "Cashout";

/// Result value marking a completed cashout
const RESULT_SUCCESS: &str = "Success";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashoutRow {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    client_id: Option<Uuid>,
    #[serde(default)]
    blockchain_type: Option<String>,
    #[serde(default)]
    to_address: Option<String>,
    #[serde(default)]
    transaction_hash: Option<String>,
}

/// Withdrawal history from the cashout processor
pub struct CashoutsProvider {
    client: HttpClient,
    blockchains: Arc<Blockchains>,
    table: String,
}

impl CashoutsProvider {
    /// Create a provider over the default table
    pub fn new(client: HttpClient, blockchains: Arc<Blockchains>) -> Self {
        Self {
            client,
            blockchains,
            table: CASHOUTS_TABLE.to_string(),
        }
    }

    /// Read from a non-default table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn map_row(&self, row: CashoutRow) -> Option<Transaction> {
        if row.result.as_deref() != Some(RESULT_SUCCESS) {
            return None;
        }

        let hash = non_blank(row.transaction_hash)?;
        let to_address = non_blank(row.to_address)?;
        let blockchain = self
            .blockchains
            .by_integration_id(non_blank(row.blockchain_type)?.as_str())?;

        Some(Transaction::withdrawal(
            &blockchain.crypto_currency,
            hash,
            row.client_id?,
            to_address,
        ))
    }
}

#[async_trait]
impl HistoryProvider for CashoutsProvider {
    fn name(&self) -> &str {
        "cashouts"
    }

    async fn fetch_page(&self, continuation: Option<Continuation>) -> Result<Page> {
        let token = continuation.map(Continuation::into_inner);
        let segment: TableSegment<CashoutRow> = self
            .client
            .get_json(
                &format!("tables/{}/rows", self.table),
                &[
                    ("take", TABLE_PAGE_SIZE),
                    ("continuation", token.as_deref().unwrap_or("")),
                ],
            )
            .await?;

        let items = segment
            .rows
            .into_iter()
            .filter_map(|row| self.map_row(row))
            .collect();

        Ok(Page::from_token(items, segment.continuation))
    }
}
