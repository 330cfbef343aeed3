//! Deployment of the `BuyMeACoffee` contract.

use alloy_json_abi::ContractObject;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use eyre::{OptionExt, Result, WrapErr};
use std::path::Path;
use tipjar::parse_private_key;
use tipjar_config::Config;

/// Reads the creation bytecode from a Hardhat or Foundry artifact.
///
/// Hardhat stores it as a hex string under `bytecode`, Foundry as `bytecode.object`.
pub fn load_bytecode(path: &Path) -> Result<Bytes> {
    let json = std::fs::read_to_string(path).wrap_err_with(|| {
        format!("failed to read artifact {}; compile the contract first", path.display())
    })?;
    let artifact: ContractObject = serde_json::from_str(&json)
        .wrap_err_with(|| format!("failed to parse artifact {}", path.display()))?;
    let bytecode = artifact
        .bytecode
        .filter(|code| !code.is_empty())
        .ok_or_eyre("artifact has no creation bytecode")?;
    Ok(bytecode)
}

/// Deploys the contract from `config.artifact` with the configured signer and waits for it to be
/// mined.
pub async fn deploy(config: &Config) -> Result<Address> {
    let bytecode = load_bytecode(&config.artifact)?;
    let key = config
        .private_key
        .as_deref()
        .ok_or_eyre("no private key configured, set $PRIVATE_KEY")?;
    let signer = parse_private_key(key)?;
    let deployer = signer.address();
    let url = config.rpc_endpoint()?;

    info!(%deployer, artifact = %config.artifact.display(), "deploying BuyMeACoffee");
    let provider = ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_http(url);
    let tx = TransactionRequest::default().with_from(deployer).with_deploy_code(bytecode);
    let pending = provider.send_transaction(tx).await.wrap_err("failed to send deployment")?;
    debug!(tx_hash = %pending.tx_hash(), "waiting for deployment");
    let receipt = pending.get_receipt().await.wrap_err("failed to get deployment receipt")?;

    eyre::ensure!(receipt.status(), "deployment {} reverted", receipt.transaction_hash);
    receipt.contract_address.ok_or_eyre("receipt has no contract address")
}

/// Entry point of `tipjar-deploy`.
pub async fn run() -> Result<()> {
    let config = Config::load()?;
    let address = deploy(&config).await?;
    println!("Contract deployed to: {address}");
    Ok(())
}
