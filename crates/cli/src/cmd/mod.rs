//! Subcommands of the `tipjar` binary.

use crate::utils;
use eyre::{Result, WrapErr};
use tipjar::{ReadOnlyClient, SignerWallet, TipJar};
use tipjar_config::Config;

pub mod app;
pub mod deploy;
pub mod show;
pub mod tip;
pub mod watch;
pub mod withdraw;

/// The driver as used by every command.
pub type App = TipJar<ReadOnlyClient, SignerWallet>;

/// Connects the read-only client. Nothing is fetched yet.
pub async fn open(config: &Config) -> Result<App> {
    let reader = ReadOnlyClient::connect(config)
        .await
        .inspect_err(|err| utils::alert(err.alert()))
        .wrap_err_with(|| format!("failed to connect to {}", config.redacted_rpc_endpoint()))?;
    Ok(TipJar::new(reader, utils::alert))
}

/// Connects the read-only client and fetches the contract state, failing if either fails.
pub async fn open_loaded(config: &Config) -> Result<App> {
    let mut app = open(config).await?;
    if !app.load().await {
        eyre::bail!("failed to load the contract state");
    }
    Ok(app)
}

/// Connects the configured signer wallet.
pub async fn connect_wallet(app: &mut App, config: &Config) -> bool {
    match SignerWallet::from_config(config) {
        Ok(wallet) => app.connect(wallet).await,
        Err(err) => {
            app.report("failed to set up wallet", &err);
            false
        }
    }
}
