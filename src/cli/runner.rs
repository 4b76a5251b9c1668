//! CLI runner
//!
//! Builds providers from settings, runs the export engine, and writes the
//! report. Ctrl-C is wired into the engine's shutdown hook so a stuck
//! source can be abandoned without `kill -9`.

use super::commands::{Cli, Commands};
use crate::blockchains::Blockchains;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::export::Exporter;
use crate::http::HttpClient;
use crate::provider::HistoryProvider;
use crate::providers::{
    load_deposit_wallets, BtcDepositsProvider, CashOperationsProvider, CashoutsProvider,
};
use crate::report::Report;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Executes CLI commands
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner from parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Export { output, sources } => {
                self.export(output.clone(), sources.as_deref()).await
            }
            Commands::Validate => self.validate(),
        }
    }

    fn validate(&self) -> Result<()> {
        let settings = Settings::from_file(&self.cli.config)?;
        let providers = build_providers(&settings)?;
        println!("Settings OK: {} source(s) configured", providers.len());
        for provider in &providers {
            println!("  - {}", provider.name());
        }
        Ok(())
    }

    async fn export(&self, output: Option<PathBuf>, sources: Option<&str>) -> Result<()> {
        let settings = Settings::from_file(&self.cli.config)?;
        let mut providers = build_providers(&settings)?;

        if let Some(filter) = sources {
            providers = filter_providers(providers, filter)?;
        }

        let report = Arc::new(Report::new());
        let exporter = Exporter::new(Arc::clone(&report)).with_shutdown(shutdown_on_ctrl_c());

        let total = exporter.run(providers).await?;
        info!(total, "all sources exported");

        let output = output.unwrap_or_else(|| settings.report.output.clone());
        report.save_csv(&output)?;

        Ok(())
    }
}

/// Build one provider per configured source
fn build_providers(settings: &Settings) -> Result<Vec<Arc<dyn HistoryProvider>>> {
    let blockchains = Arc::new(Blockchains::new());
    let mut providers: Vec<Arc<dyn HistoryProvider>> = Vec::new();

    if let Some(btc) = &settings.btc {
        let wallets = load_deposit_wallets(&btc.deposit_wallets)?;
        let client = HttpClient::with_config(settings.http.client_config(&btc.ninja_url, None));
        providers.push(Arc::new(BtcDepositsProvider::new(
            client,
            &blockchains,
            wallets,
        )));
    }

    if let Some(cash) = &settings.cash_operations {
        let client = HttpClient::with_config(
            settings
                .http
                .client_config(&cash.base_url, cash.api_key.as_deref()),
        );
        let mut provider =
            CashOperationsProvider::new(client, Arc::clone(&blockchains)).with_since(cash.since);
        if let Some(table) = &cash.table {
            provider = provider.with_table(table);
        }
        providers.push(Arc::new(provider));
    }

    if let Some(cashouts) = &settings.cashouts {
        let client = HttpClient::with_config(
            settings
                .http
                .client_config(&cashouts.base_url, cashouts.api_key.as_deref()),
        );
        let mut provider = CashoutsProvider::new(client, Arc::clone(&blockchains));
        if let Some(table) = &cashouts.table {
            provider = provider.with_table(table);
        }
        providers.push(Arc::new(provider));
    }

    Ok(providers)
}

/// Keep only the providers named in the comma-separated filter
fn filter_providers(
    providers: Vec<Arc<dyn HistoryProvider>>,
    filter: &str,
) -> Result<Vec<Arc<dyn HistoryProvider>>> {
    let wanted: Vec<&str> = filter.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

    for name in &wanted {
        if !providers.iter().any(|p| p.name() == *name) {
            return Err(Error::config(format!("unknown source '{name}'")));
        }
    }

    Ok(providers
        .into_iter()
        .filter(|p| wanted.contains(&p.name()))
        .collect())
}

/// Shutdown signal that fires on the first Ctrl-C
fn shutdown_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("shutdown requested, abandoning in-flight retries");
            let _ = tx.send(true);
        }
    });
    rx
}
