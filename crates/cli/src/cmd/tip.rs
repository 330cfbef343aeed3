use crate::{opts::ConnectionOpts, render};
use clap::Parser;
use eyre::Result;

/// CLI arguments for `tipjar tip`.
#[derive(Clone, Debug, Parser)]
pub struct TipArgs {
    #[command(flatten)]
    opts: ConnectionOpts,

    /// Your name. Recorded as "Anonymous" if empty.
    #[arg(long, short, default_value = "")]
    name: String,

    /// A message for the owner. Recorded as "Enjoy your coffee!" if empty.
    #[arg(long, short, default_value = "")]
    message: String,
}

impl TipArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let mut app = super::open(&config).await?;
        app.load().await;
        if !super::connect_wallet(&mut app, &config).await {
            eyre::bail!("failed to connect wallet");
        }

        let Some(confirmation) = app.send_tip(&self.name, &self.message).await else {
            eyre::bail!("failed to send tip");
        };
        println!("Transaction: {}", confirmation.tx_hash);
        println!("\n{}", render::page(app.state()));
        Ok(())
    }
}
