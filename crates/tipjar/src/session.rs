//! Authenticated wallet sessions.

use crate::{Confirmation, Result, Tip, TipJarError, Wallet};
use alloy_primitives::Address;

/// Connection status of the wallet, as shown to the user.
///
/// `Disconnected -> Connecting -> Connected` on success, `Connecting -> Disconnected` on any
/// failure. There is no automatic reconnection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected { account: Address, chain_id: u64 },
}

impl SessionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            Self::Connected { account, .. } => Some(*account),
            _ => None,
        }
    }
}

/// A wallet that passed the connection checks.
///
/// The only way to obtain one is [`WalletSession::connect`], so holding a session means the
/// account was granted and the wallet is on the expected chain.
#[derive(Clone, Debug)]
pub struct WalletSession<W> {
    wallet: W,
    account: Address,
    chain_id: u64,
}

impl<W: Wallet> WalletSession<W> {
    /// Requests account access and verifies the wallet's chain id.
    ///
    /// Fails with [`TipJarError::WalletAbsent`] without a wallet and with
    /// [`TipJarError::WrongNetwork`] if the wallet is on another chain. The network is never
    /// switched on the user's behalf.
    pub async fn connect(wallet: Option<W>, expected_chain_id: u64) -> Result<Self> {
        let wallet = wallet.ok_or(TipJarError::WalletAbsent)?;
        let account = wallet
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(TipJarError::WalletAbsent)?;

        let chain_id = wallet.chain_id().await?;
        if chain_id != expected_chain_id {
            return Err(TipJarError::WrongNetwork { expected: expected_chain_id, actual: chain_id });
        }

        debug!(%account, chain_id, "wallet connected");
        Ok(Self { wallet, account, chain_id })
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::Connected { account: self.account, chain_id: self.chain_id }
    }

    /// Sends a tip and waits for it to be mined.
    pub async fn send_tip(&self, tip: &Tip) -> Result<Confirmation> {
        debug!(account = %self.account, name = %tip.name, value = %tip.value, "sending tip");
        self.wallet.buy_coffee(tip).await
    }

    /// Withdraws the contract balance and waits for it to be mined.
    ///
    /// Only the owner may withdraw; the contract enforces this and the call fails otherwise.
    pub async fn withdraw(&self) -> Result<Confirmation> {
        debug!(account = %self.account, "withdrawing tips");
        self.wallet.withdraw_tips().await
    }
}
