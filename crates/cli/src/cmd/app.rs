use super::App;
use crate::{opts::ConnectionOpts, render, utils};
use chrono::Local;
use clap::Parser;
use eyre::Result;
use std::{fmt, str::FromStr};
use tipjar::{MemoEvent, MemoSubscription, PendingTransaction, TxOutcome};
use tipjar_config::Config;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

const HELP: &str = "\
Commands:
  connect   connect the configured wallet
  tip       send 0.001 ETH with your name and a message
  withdraw  withdraw all tips to the owner (owner only)
  refresh   fetch memos, owner and balance again
  show      print the page
  help      print this message
  quit      exit";

/// CLI arguments for `tipjar app`, the interactive session.
#[derive(Clone, Debug, Default, Parser)]
pub struct AppArgs {
    #[command(flatten)]
    pub opts: ConnectionOpts,
}

/// A line typed at the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Connect,
    Tip,
    Withdraw,
    Refresh,
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownCommand(String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command `{}`, type `help` for a list of commands", self.0)
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "connect" | "c" => Self::Connect,
            "tip" | "coffee" | "t" => Self::Tip,
            "withdraw" | "w" => Self::Withdraw,
            "refresh" | "r" => Self::Refresh,
            "show" | "s" | "ls" => Self::Show,
            "help" | "h" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(UnknownCommand(other.to_string())),
        })
    }
}

impl AppArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.opts.load_config()?;
        let mut app = super::open(&config).await?;
        app.load().await;
        println!("{}", render::page(app.state()));

        let mut session = Repl {
            config,
            subscription: app.subscribe().await.ok(),
            pending: None,
            app,
        };
        let lines = BufReader::new(tokio::io::stdin()).lines();
        session.run(lines).await
    }
}

struct Repl {
    config: Config,
    app: App,
    subscription: Option<MemoSubscription>,
    pending: Option<PendingTransaction>,
}

/// Resolves when the pending transaction is mined; never if there is none.
async fn mined(pending: &mut Option<PendingTransaction>) -> TxOutcome {
    match pending {
        Some(tx) => tx.await,
        None => std::future::pending().await,
    }
}

/// The next `NewMemo` event; never if there is no subscription.
async fn next_memo(subscription: &mut Option<MemoSubscription>) -> Option<MemoEvent> {
    match subscription {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

impl Repl {
    async fn run<R: AsyncBufRead + Unpin>(&mut self, mut lines: Lines<R>) -> Result<()> {
        println!("\n{HELP}");
        loop {
            print_prompt();
            tokio::select! {
                outcome = mined(&mut self.pending) => {
                    self.pending = None;
                    println!();
                    if self.app.settle(outcome).await.is_some() {
                        println!("{}", render::page(self.app.state()));
                    }
                }
                event = next_memo(&mut self.subscription) => {
                    match event {
                        Some(event) => {
                            let listed = self.app.state().memos.len();
                            self.app.on_memo(event.clone()).await;
                            if self.app.state().memos.len() > listed {
                                println!("\n{}", render::memo(&event.memo, &Local));
                            }
                        }
                        None => {
                            warn!("NewMemo subscription ended");
                            self.subscription = None;
                        }
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(command) => self.execute(command, &mut lines).await?,
                        Err(err) => println!("{err}"),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            }
        }

        if self.pending.is_some() {
            warn!("exiting with a transaction still pending");
            println!("A transaction is still pending and may be mined after exit.");
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        Ok(())
    }

    async fn execute<R: AsyncBufRead + Unpin>(
        &mut self,
        command: Command,
        lines: &mut Lines<R>,
    ) -> Result<()> {
        match command {
            Command::Connect => {
                if super::connect_wallet(&mut self.app, &self.config).await {
                    println!("{}", render::page(self.app.state()));
                }
            }
            Command::Tip => {
                let name = utils::prompt(lines, "Name").await?;
                let message = utils::prompt(lines, "Message").await?;
                if let Some(pending) = self.app.begin_tip(&name, &message) {
                    println!("Tip sent, waiting for it to be mined...");
                    self.pending = Some(pending);
                }
            }
            Command::Withdraw => {
                if let Some(pending) = self.app.begin_withdraw() {
                    println!("Withdrawal sent, waiting for it to be mined...");
                    self.pending = Some(pending);
                }
            }
            Command::Refresh => {
                if self.app.refresh().await {
                    println!("{}", render::page(self.app.state()));
                }
            }
            Command::Show => println!("{}", render::page(self.app.state())),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("connect".parse(), Ok(Command::Connect));
        assert_eq!("  TIP ".parse(), Ok(Command::Tip));
        assert_eq!("w".parse(), Ok(Command::Withdraw));
        assert_eq!("exit".parse(), Ok(Command::Quit));
        assert_eq!("?".parse(), Ok(Command::Help));
        assert_eq!(
            "send".parse::<Command>().unwrap_err().to_string(),
            "unknown command `send`, type `help` for a list of commands"
        );
    }
}
