use crate::{opts::ConnectionOpts, render};
use chrono::Local;
use clap::Parser;
use eyre::Result;

/// CLI arguments for `tipjar watch`.
#[derive(Clone, Debug, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    opts: ConnectionOpts,
}

impl WatchArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let mut app = super::open_loaded(&config).await?;
        println!("{}", render::page(app.state()));

        let mut subscription = app.subscribe().await?;
        println!("\nWaiting for new coffees, press Ctrl-C to stop.");
        loop {
            tokio::select! {
                event = subscription.recv() => {
                    let Some(event) = event else {
                        warn!("NewMemo subscription ended");
                        break;
                    };
                    println!("\n{}", render::memo(&event.memo, &Local));
                    app.on_memo(event).await;
                    println!(
                        "Contract Balance: {} ETH",
                        render::format_balance(app.state().view.balance)
                    );
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        subscription.unsubscribe();
        Ok(())
    }
}
