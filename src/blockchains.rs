//! Blockchain registry
//!
//! Maps the asset ids and integration-layer ids found in source records to
//! the blockchain they belong to. Providers use this to resolve a record's
//! crypto currency; records whose asset is unknown are skipped locally and
//! never reach the engine.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One supported blockchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blockchain {
    /// Human-readable name
    pub name: String,
    /// Currency code used in the report, e.g. "BTC"
    pub crypto_currency: String,
    /// Integration-layer id used by the cashout processor
    pub integration_id: String,
}

impl Blockchain {
    fn new(name: &str, crypto_currency: &str, integration_id: &str) -> Self {
        Self {
            name: name.to_string(),
            crypto_currency: crypto_currency.to_string(),
            integration_id: integration_id.to_string(),
        }
    }
}

static BUILTIN: Lazy<Vec<(Blockchain, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            Blockchain::new("Bitcoin", "BTC", "Bitcoin"),
            vec!["BTC", "LykkeBTC"],
        ),
        (
            Blockchain::new("Ethereum", "ETH", "Ethereum"),
            vec!["ETH", "LykkeETH"],
        ),
        (
            Blockchain::new("LiteCoin", "LTC", "LiteCoin"),
            vec!["LTC", "LykkeLTC"],
        ),
    ]
});

/// Lookup registry over the supported blockchains
#[derive(Debug, Clone)]
pub struct Blockchains {
    by_asset_id: HashMap<String, Blockchain>,
    by_integration_id: HashMap<String, Blockchain>,
}

impl Blockchains {
    /// Create a registry with the built-in blockchains
    pub fn new() -> Self {
        let mut registry = Self {
            by_asset_id: HashMap::new(),
            by_integration_id: HashMap::new(),
        };
        for (blockchain, asset_ids) in BUILTIN.iter() {
            registry.register(blockchain.clone(), asset_ids.iter().map(|s| (*s).to_string()));
        }
        registry
    }

    /// Register a blockchain under the given asset ids
    pub fn register(&mut self, blockchain: Blockchain, asset_ids: impl IntoIterator<Item = String>) {
        for asset_id in asset_ids {
            self.by_asset_id.insert(asset_id, blockchain.clone());
        }
        self.by_integration_id
            .insert(blockchain.integration_id.clone(), blockchain);
    }

    /// Look up a blockchain by the asset id carried in a source record
    pub fn by_asset_id(&self, asset_id: &str) -> Option<&Blockchain> {
        self.by_asset_id.get(asset_id)
    }

    /// Look up a blockchain by its integration-layer id
    pub fn by_integration_id(&self, integration_id: &str) -> Option<&Blockchain> {
        self.by_integration_id.get(integration_id)
    }

    /// The Bitcoin blockchain, which is always registered
    pub fn bitcoin(&self) -> &Blockchain {
        self.by_asset_id("BTC").expect("Bitcoin is built in")
    }
}

impl Default for Blockchains {
    fn default() -> Self {
        Self::new()
    }
}
