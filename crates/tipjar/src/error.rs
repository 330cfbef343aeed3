//! Errors raised by the client.

use alloy_primitives::Address;

/// Everything that can go wrong talking to the chain or the wallet.
///
/// None of these are fatal: the application layer logs them and shows [`Self::alert`] to the
/// user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TipJarError {
    /// The RPC endpoint is unreachable or misconfigured.
    #[error("network error: {0}")]
    Network(String),
    /// No wallet is available to sign transactions.
    #[error("no wallet available")]
    WalletAbsent,
    /// The wallet is connected to a different chain.
    #[error("wallet is on chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },
    /// The transaction was rejected, reverted or ran out of gas.
    #[error("transaction failed: {0}")]
    Transaction(String),
    /// The caller is not allowed to perform the operation.
    #[error("{caller} is not the contract owner{}", fmt_owner(.owner))]
    Authorization { caller: Address, owner: Option<Address>, reason: String },
    /// A write was attempted without a connected wallet session.
    #[error("wallet not connected")]
    NotConnected,
    /// Another transaction is still waiting for confirmation.
    #[error("a transaction is already pending")]
    TransactionPending,
}

impl TipJarError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn transaction(err: impl std::fmt::Display) -> Self {
        Self::Transaction(err.to_string())
    }

    /// The message shown to the user when this error is surfaced.
    pub fn alert(&self) -> &'static str {
        match self {
            Self::Network(_) => "Failed to load data from the network. See logs for details.",
            Self::WalletAbsent => "Please configure a wallet (PRIVATE_KEY) to use this app!",
            Self::WrongNetwork { .. } => "Please switch your wallet to Sepolia testnet!",
            Self::Transaction(_) => "Transaction failed. See logs for details.",
            Self::Authorization { .. } => "Only the contract owner can withdraw.",
            Self::NotConnected => "Connect your wallet first.",
            Self::TransactionPending => "A transaction is already pending.",
        }
    }
}

fn fmt_owner(owner: &Option<Address>) -> String {
    owner.map(|owner| format!(" ({owner})")).unwrap_or_default()
}

pub type Result<T, E = TipJarError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn authorization_display() {
        let caller = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let owner = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let err =
            TipJarError::Authorization { caller, owner: Some(owner), reason: "revert".into() };
        assert_eq!(err.to_string(), format!("{caller} is not the contract owner ({owner})"));
        assert_eq!(err.alert(), "Only the contract owner can withdraw.");

        let err = TipJarError::Authorization { caller, owner: None, reason: String::new() };
        assert_eq!(err.to_string(), format!("{caller} is not the contract owner"));
    }

    #[test]
    fn wrong_network_display() {
        let err = TipJarError::WrongNetwork { expected: 11155111, actual: 1 };
        assert_eq!(err.to_string(), "wallet is on chain 1, expected chain 11155111");
        assert_eq!(err.alert(), "Please switch your wallet to Sepolia testnet!");
    }
}
