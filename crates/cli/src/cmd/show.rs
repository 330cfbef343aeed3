use crate::{opts::ConnectionOpts, render};
use clap::Parser;
use eyre::Result;

/// CLI arguments for `tipjar show`.
#[derive(Clone, Debug, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    opts: ConnectionOpts,

    /// Print the memos, owner and balance as JSON.
    #[arg(long, short, help_heading = "Display options")]
    json: bool,
}

impl ShowArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let app = super::open_loaded(&config).await?;
        if self.json {
            println!("{}", render::json(app.state())?);
        } else {
            println!("{}", render::page(app.state()));
        }
        Ok(())
    }
}
