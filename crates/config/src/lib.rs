//! # tipjar-config
//!
//! Configuration and compile-time constants for the tipjar client.
//!
//! Values are layered with [figment], lowest priority first:
//!
//! 1. [`Config::default()`]
//! 2. `tipjar.toml` in the current directory (or the file named by `$TIPJAR_CONFIG`)
//! 3. `TIPJAR_`-prefixed environment variables, e.g. `TIPJAR_RPC_URL`
//! 4. the plain `ALCHEMY_API_KEY` and `PRIVATE_KEY` environment variables

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, U256, address};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

mod error;
pub use error::{EndpointError, ExtractConfigError};

/// Chain id of the Sepolia testnet. Writes are refused on any other chain.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Address of the deployed `BuyMeACoffee` contract on Sepolia.
pub const CONTRACT_ADDRESS: Address = address!("0x3f039512f30674852A3B778B711eb73062a36370");

/// Value attached to every tip: 0.001 ether.
pub const TIP_AMOUNT: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// Alchemy's Sepolia endpoint; the API key is appended as the last path segment.
pub const ALCHEMY_SEPOLIA_URL: &str = "https://eth-sepolia.g.alchemy.com/v2/";

/// Environment variable holding the Alchemy API key.
pub const ALCHEMY_API_KEY_ENV: &str = "ALCHEMY_API_KEY";

/// Environment variable holding the signer's private key.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Where Hardhat writes the compiled contract by default.
pub const DEFAULT_ARTIFACT: &str = "artifacts/contracts/BuyMeACoffee.sol/BuyMeACoffee.json";

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API key for the hosted Alchemy endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alchemy_api_key: Option<String>,
    /// Explicit RPC endpoint, takes precedence over the Alchemy endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Hex-encoded private key of the wallet used for writes and deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Path to the compiled contract artifact used by the deployer.
    pub artifact: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alchemy_api_key: None,
            rpc_url: None,
            private_key: None,
            artifact: PathBuf::from(DEFAULT_ARTIFACT),
        }
    }
}

impl Config {
    /// The name of the config file.
    pub const FILE_NAME: &'static str = "tipjar.toml";

    /// Loads the config from the default figment.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Returns the default figment: defaults, `tipjar.toml`, then environment variables.
    pub fn figment() -> Figment {
        Figment::from(Self::default())
            .merge(Toml::file(Env::var_or("TIPJAR_CONFIG", Self::FILE_NAME)))
            .merge(Env::prefixed("TIPJAR_").ignore(&["CONFIG"]))
            .merge(Env::raw().only(&[ALCHEMY_API_KEY_ENV, PRIVATE_KEY_ENV]))
    }

    /// Attempts to extract a `Config` from `provider`.
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::from)
    }

    /// Resolves the RPC endpoint: the explicit `rpc_url` if set, otherwise the Alchemy Sepolia
    /// endpoint for the configured API key.
    pub fn rpc_endpoint(&self) -> Result<Url, EndpointError> {
        let url = match (&self.rpc_url, &self.alchemy_api_key) {
            (Some(url), _) => url.clone(),
            (None, Some(key)) if !key.trim().is_empty() => {
                format!("{ALCHEMY_SEPOLIA_URL}{}", key.trim())
            }
            _ => return Err(EndpointError::MissingApiKey),
        };
        Url::parse(&url).map_err(|source| EndpointError::InvalidUrl { url, source })
    }

    /// Same as [`Self::rpc_endpoint`] but with the API key masked, for logs and messages.
    pub fn redacted_rpc_endpoint(&self) -> String {
        match self.rpc_endpoint() {
            Ok(_) if self.rpc_url.is_none() => format!("{ALCHEMY_SEPOLIA_URL}<redacted>"),
            Ok(url) => url.to_string(),
            Err(_) => "<unset>".to_string(),
        }
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("tipjar defaults")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
