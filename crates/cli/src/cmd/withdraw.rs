use crate::{opts::ConnectionOpts, render};
use clap::Parser;
use eyre::Result;

/// CLI arguments for `tipjar withdraw`.
#[derive(Clone, Debug, Parser)]
pub struct WithdrawArgs {
    #[command(flatten)]
    opts: ConnectionOpts,
}

impl WithdrawArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let mut app = super::open_loaded(&config).await?;
        if !super::connect_wallet(&mut app, &config).await {
            eyre::bail!("failed to connect wallet");
        }

        let Some(confirmation) = app.withdraw().await else {
            eyre::bail!("failed to withdraw tips");
        };
        println!("Transaction: {}", confirmation.tx_hash);
        println!("\n{}", render::page(app.state()));
        Ok(())
    }
}
