use clap::Parser;
use figment::{
    Metadata, Profile, Provider,
    providers::Serialized,
    value::{Dict, Map},
};
use serde::Serialize;
use tipjar_config::{Config, ExtractConfigError};

/// Options shared by every command that talks to the chain.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Connection options")]
pub struct ConnectionOpts {
    /// The RPC endpoint.
    ///
    /// Defaults to the Alchemy Sepolia endpoint for `$ALCHEMY_API_KEY`.
    #[arg(long, short, visible_alias = "rpc", env = "ETH_RPC_URL", value_name = "URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// The private key of the wallet signing transactions.
    #[arg(long, env = "PRIVATE_KEY", value_name = "RAW_PRIVATE_KEY", hide_env_values = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl Provider for ConnectionOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl ConnectionOpts {
    /// Loads the config with these options merged on top.
    pub fn load_config(&self) -> Result<Config, ExtractConfigError> {
        Config::try_from(Config::figment().merge(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn parse_connection_opts() {
        let opts = ConnectionOpts::parse_from([
            "tipjar",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            "0x01",
        ]);
        assert_eq!(opts.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(opts.private_key.as_deref(), Some("0x01"));
    }

    #[test]
    fn cli_overrides_everything() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("tipjar.toml", r#"rpc_url = "http://from-toml:8545""#)?;
            jail.set_env("TIPJAR_RPC_URL", "http://from-env:8545");
            jail.set_env("ALCHEMY_API_KEY", "abc");

            let opts = ConnectionOpts::default();
            let config = opts.load_config().unwrap();
            assert_eq!(config.rpc_url.as_deref(), Some("http://from-env:8545"));
            assert_eq!(config.alchemy_api_key.as_deref(), Some("abc"));

            let opts = ConnectionOpts {
                rpc_url: Some("http://from-cli:8545".into()),
                private_key: None,
            };
            let config = opts.load_config().unwrap();
            assert_eq!(config.rpc_endpoint().unwrap().as_str(), "http://from-cli:8545/");
            assert_eq!(config.private_key, None);
            Ok(())
        });
    }
}
