//! Settings
//!
//! YAML settings file describing which sources to export and how to reach
//! them. A source participates in the export iff its section is present.
//!
//! ```yaml
//! report:
//!   output: transactions.csv
//! http:
//!   timeout_secs: 30
//!   requests_per_second: 10
//! btc:
//!   ninja_url: https://ninja.example.com
//!   deposit_wallets: wallets.csv
//! cash_operations:
//!   base_url: https://operations.example.com
//!   api_key: secret
//!   since: 2018-01-01T00:00:00Z
//! cashouts:
//!   base_url: https://cashouts.example.com
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Report output settings
    #[serde(default)]
    pub report: ReportSettings,
    /// HTTP client tuning shared by all sources
    #[serde(default)]
    pub http: HttpSettings,
    /// Bitcoin deposits source
    #[serde(default)]
    pub btc: Option<BtcSettings>,
    /// Cash operations withdrawals source
    #[serde(default)]
    pub cash_operations: Option<CashOperationsSettings>,
    /// Cashout withdrawals source
    #[serde(default)]
    pub cashouts: Option<CashoutsSettings>,
}

/// Report output settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Where the CSV report is written
    #[serde(default = "default_report_output")]
    pub output: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output: default_report_output(),
        }
    }
}

fn default_report_output() -> PathBuf {
    PathBuf::from("transactions.csv")
}

/// HTTP client tuning
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Requests per second per source; unset uses the client default
    #[serde(default)]
    pub requests_per_second: Option<u32>,
    /// Token bucket burst size; defaults to `requests_per_second`
    #[serde(default)]
    pub burst_size: Option<u32>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            requests_per_second: None,
            burst_size: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl HttpSettings {
    /// Build a client config for one source
    pub fn client_config(&self, base_url: &str, api_key: Option<&str>) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(base_url)
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::new(rps, self.burst_size.unwrap_or(rps)));
        }
        if let Some(key) = api_key {
            builder = builder.header("x-api-key", key);
        }

        builder.build()
    }
}

/// Bitcoin deposits source settings
#[derive(Debug, Clone, Deserialize)]
pub struct BtcSettings {
    /// Base URL of the QBitNinja-style indexer
    pub ninja_url: String,
    /// CSV file listing deposit wallets
    pub deposit_wallets: PathBuf,
}

/// Cash operations source settings
#[derive(Debug, Clone, Deserialize)]
pub struct CashOperationsSettings {
    /// Base URL of the operations table store
    pub base_url: String,
    /// API key sent as `x-api-key`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Table to read; defaults to the production table name
    #[serde(default)]
    pub table: Option<String>,
    /// Only export operations at or after this instant
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

/// Cashouts source settings
#[derive(Debug, Clone, Deserialize)]
pub struct CashoutsSettings {
    /// Base URL of the cashout processor's table store
    pub base_url: String,
    /// API key sent as `x-api-key`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Table to read; defaults to the production table name
    #[serde(default)]
    pub table: Option<String>,
}

impl Settings {
    /// Load and validate settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings describe a runnable export
    pub fn validate(&self) -> Result<()> {
        if self.btc.is_none() && self.cash_operations.is_none() && self.cashouts.is_none() {
            return Err(Error::config("no sources configured"));
        }
        if let Some(btc) = &self.btc {
            check_base_url("btc.ninja_url", &btc.ninja_url)?;
        }
        if let Some(cash) = &self.cash_operations {
            check_base_url("cash_operations.base_url", &cash.base_url)?;
        }
        if let Some(cashouts) = &self.cashouts {
            check_base_url("cashouts.base_url", &cashouts.base_url)?;
        }
        Ok(())
    }
}

fn check_base_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::missing_field(field));
    }
    url::Url::parse(value).map_err(|e| Error::InvalidConfigValue {
        field: field.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
