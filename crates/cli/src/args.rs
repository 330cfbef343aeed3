use crate::cmd::{
    app::AppArgs, show::ShowArgs, tip::TipArgs, watch::WatchArgs, withdraw::WithdrawArgs,
};
use clap::{Parser, Subcommand};

/// Buy the owner of the tip jar a coffee, on Sepolia.
///
/// Without a subcommand, starts an interactive session.
#[derive(Debug, Parser)]
#[command(name = "tipjar", version, next_display_order = None)]
pub struct TipJarArgs {
    #[command(subcommand)]
    pub cmd: Option<TipJarSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum TipJarSubcommand {
    /// Start an interactive session: browse memos, tip and withdraw while new memos stream in.
    #[command(visible_alias = "i")]
    App(AppArgs),

    /// Print the memos, the owner and the contract balance.
    #[command(visible_alias = "s")]
    Show(ShowArgs),

    /// Print the page, then every new memo as it is emitted.
    #[command(visible_alias = "w")]
    Watch(WatchArgs),

    /// Send a tip of 0.001 ETH with a name and a message.
    #[command(visible_alias = "t")]
    Tip(TipArgs),

    /// Withdraw all tips to the owner.
    Withdraw(WithdrawArgs),
}

impl TipJarArgs {
    pub async fn run(self) -> eyre::Result<()> {
        match self.cmd.unwrap_or_else(|| TipJarSubcommand::App(AppArgs::default())) {
            TipJarSubcommand::App(cmd) => cmd.run().await,
            TipJarSubcommand::Show(cmd) => cmd.run().await,
            TipJarSubcommand::Watch(cmd) => cmd.run().await,
            TipJarSubcommand::Tip(cmd) => cmd.run().await,
            TipJarSubcommand::Withdraw(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        TipJarArgs::command().debug_assert();
    }

    #[test]
    fn defaults_to_interactive() {
        let args = TipJarArgs::parse_from(["tipjar"]);
        assert!(args.cmd.is_none());
    }

    #[test]
    fn parses_subcommands() {
        let args = TipJarArgs::parse_from(["tipjar", "show", "--json"]);
        assert!(matches!(args.cmd, Some(TipJarSubcommand::Show(_))));

        let args = TipJarArgs::parse_from(["tipjar", "tip", "--name", "alice", "-m", "gm"]);
        assert!(matches!(args.cmd, Some(TipJarSubcommand::Tip(_))));

        let args =
            TipJarArgs::parse_from(["tipjar", "withdraw", "--rpc-url", "http://localhost:8545"]);
        assert!(matches!(args.cmd, Some(TipJarSubcommand::Withdraw(_))));
    }
}
