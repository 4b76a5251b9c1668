//! Cash operations withdrawals provider
//!
//! Reads the `OperationsCash` table of the operations store. A withdrawal
//! is a negative-amount operation that left the platform: it must carry a
//! blockchain hash, a destination distinct from the source address, a
//! known asset and a client id. Anything else is an internal movement and
//! is skipped.

use super::{non_blank, TableSegment, TABLE_PAGE_SIZE};
use crate::blockchains::Blockchains;
use crate::error::Result;
use crate::http::HttpClient;
use crate::provider::{Continuation, HistoryProvider, Page};
use crate::report::Transaction;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Default table holding cash operations
pub const CASH_OPERATIONS_TABLE: &str = "OperationsCash";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashOperationRow {
    #[serde(default)]
    date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    asset_id: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    block_chain_hash: Option<String>,
    #[serde(default)]
    address_from: Option<String>,
    #[serde(default)]
    address_to: Option<String>,
}

/// Withdrawal history from the cash operations table
pub struct CashOperationsProvider {
    client: HttpClient,
    blockchains: Arc<Blockchains>,
    table: String,
    since: Option<DateTime<Utc>>,
}

impl CashOperationsProvider {
    /// Create a provider over the default table
    pub fn new(client: HttpClient, blockchains: Arc<Blockchains>) -> Self {
        Self {
            client,
            blockchains,
            table: CASH_OPERATIONS_TABLE.to_string(),
            since: None,
        }
    }

    /// Read from a non-default table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Only export operations at or after this instant
    #[must_use]
    pub fn with_since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    fn map_row(&self, row: CashOperationRow) -> Option<Transaction> {
        if row.amount >= 0.0 {
            return None;
        }
        if let (Some(since), Some(at)) = (self.since, row.date_time) {
            if at < since {
                return None;
            }
        }

        let address_to = non_blank(row.address_to)?;
        if row.address_from.as_deref() == Some(address_to.as_str()) {
            return None;
        }
        let hash = non_blank(row.block_chain_hash)?;
        let blockchain = self.blockchains.by_asset_id(non_blank(row.asset_id)?.as_str())?;
        let user_id = Uuid::parse_str(non_blank(row.client_id)?.as_str()).ok()?;

        Some(Transaction::withdrawal(
            &blockchain.crypto_currency,
            hash,
            user_id,
            address_to,
        ))
    }
}

#[async_trait]
impl HistoryProvider for CashOperationsProvider {
    fn name(&self) -> &str {
        "cash-operations"
    }

    async fn fetch_page(&self, continuation: Option<Continuation>) -> Result<Page> {
        let token = continuation.map(Continuation::into_inner);
        let segment: TableSegment<CashOperationRow> = self
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
