//! Signing wallets.

use crate::{
    Result, TipJarError,
    abi::IBuyMeACoffee::{self, IBuyMeACoffeeInstance},
};
use alloy_network::{Ethereum, EthereumWallet};
use alloy_primitives::{Address, TxHash, U256, hex::FromHexError};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionReceipt;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use std::str::FromStr;
use tipjar_config::{CONTRACT_ADDRESS, Config, TIP_AMOUNT};

/// Name recorded when the tipper leaves the field empty.
pub const DEFAULT_NAME: &str = "Anonymous";

/// Message recorded when the tipper leaves the field empty.
pub const DEFAULT_MESSAGE: &str = "Enjoy your coffee!";

/// Arguments of a `buyCoffee` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tip {
    pub name: String,
    pub message: String,
    /// Value sent along with the call, in wei.
    pub value: U256,
}

impl Tip {
    /// A tip of [`TIP_AMOUNT`]. Empty fields fall back to [`DEFAULT_NAME`] and
    /// [`DEFAULT_MESSAGE`]; anything else is passed through as is.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let or_default = |value: String, default: &str| {
            if value.is_empty() { default.to_string() } else { value }
        };
        Self {
            name: or_default(name.into(), DEFAULT_NAME),
            message: or_default(message.into(), DEFAULT_MESSAGE),
            value: TIP_AMOUNT,
        }
    }
}

/// Summary of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for Confirmation {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

/// A wallet able to sign for one or more accounts on some chain.
///
/// Write calls suspend until the transaction is mined.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Requests access to the wallet's accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// The chain the wallet is connected to.
    async fn chain_id(&self) -> Result<u64>;

    /// Sends `buyCoffee(tip.name, tip.message)` with `tip.value` attached.
    async fn buy_coffee(&self, tip: &Tip) -> Result<Confirmation>;

    /// Sends `withdrawTips()`.
    async fn withdraw_tips(&self) -> Result<Confirmation>;
}

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("Failed to create wallet from private key. Private key is invalid hex: {0}")]
    InvalidHex(#[from] FromHexError),
    #[error("Failed to create wallet from private key: {0}")]
    InvalidKey(String),
}

/// Parses a hex private key, with or without the `0x` prefix.
pub fn parse_private_key(key: &str) -> Result<PrivateKeySigner, PrivateKeyError> {
    let key = key.trim();
    let stripped = key.strip_prefix("0x").unwrap_or(key);
    alloy_primitives::hex::decode(stripped)?;
    PrivateKeySigner::from_str(stripped).map_err(|err| PrivateKeyError::InvalidKey(err.to_string()))
}

/// A wallet backed by a local private key, sending through the configured RPC endpoint.
#[derive(Clone, Debug)]
pub struct SignerWallet {
    address: Address,
    provider: DynProvider,
    contract: IBuyMeACoffeeInstance<DynProvider>,
}

impl SignerWallet {
    /// Builds the wallet from the configured private key.
    ///
    /// Returns `Ok(None)` if no key is configured, which the session reports as an absent
    /// wallet.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(key) = config.private_key.as_deref().filter(|key| !key.trim().is_empty()) else {
            return Ok(None);
        };
        let signer = parse_private_key(key).map_err(|err| {
            warn!(%err, "ignoring configured private key");
            TipJarError::WalletAbsent
        })?;
        let url = config.rpc_endpoint().map_err(TipJarError::network)?;
        let address = signer.address();
        debug!(%address, "using local signer wallet");
        let provider =
            ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_http(url).erased();
        Ok(Some(Self::with_provider(address, provider, CONTRACT_ADDRESS)))
    }

    /// Wraps a provider that already signs for `address`.
    fn with_provider(address: Address, provider: DynProvider, contract: Address) -> Self {
        let contract = IBuyMeACoffee::new(contract, provider.clone());
        Self { address, provider, contract }
    }
}

/// Waits for `pending` to be mined and checks its status.
async fn confirm(pending: PendingTransactionBuilder<Ethereum>) -> Result<Confirmation> {
    let tx_hash = *pending.tx_hash();
    debug!(%tx_hash, "waiting for confirmation");
    let receipt = pending.get_receipt().await.map_err(TipJarError::transaction)?;
    if !receipt.status() {
        return Err(TipJarError::Transaction(format!("transaction {tx_hash} reverted")));
    }
    let confirmation = Confirmation::from(&receipt);
    debug!(?confirmation, "transaction confirmed");
    Ok(confirmation)
}

#[async_trait]
impl Wallet for SignerWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.address])
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(TipJarError::network)
    }

    async fn buy_coffee(&self, tip: &Tip) -> Result<Confirmation> {
        let pending = self
            .contract
            .buyCoffee(tip.name.clone(), tip.message.clone())
            .value(tip.value)
            .from(self.address)
            .send()
            .await
            .map_err(TipJarError::transaction)?;
        confirm(pending).await
    }

    async fn withdraw_tips(&self) -> Result<Confirmation> {
        let pending = self
            .contract
            .withdrawTips()
            .from(self.address)
            .send()
            .await
            .map_err(TipJarError::transaction)?;
        confirm(pending).await
    }
}
