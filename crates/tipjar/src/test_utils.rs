//! In-memory stand-ins for the contract, the wallet and the alert sink.

use crate::{
    Confirmation, ContractReader, Memo, MemoEvent, Notifier, Result, Tip, TipJarError, Wallet,
};
use alloy_primitives::{Address, B256, U256, address};
use alloy_rpc_types::BlockId;
use async_trait::async_trait;
use futures::{StreamExt, channel::mpsc, stream::BoxStream};
use parking_lot::Mutex;
use std::sync::Arc;
use tipjar_config::SEPOLIA_CHAIN_ID;

pub const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Which read call should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Memos,
    Owner,
    Balance,
}

#[derive(Debug, Default)]
struct Inner {
    memos: Vec<MemoEvent>,
    owner: Address,
    balance: U256,
    block: u64,
    failing: Vec<Call>,
    watchers: Vec<mpsc::UnboundedSender<MemoEvent>>,
}

/// A fake `BuyMeACoffee` deployment.
#[derive(Clone, Debug, Default)]
pub struct MockChain {
    inner: Arc<Mutex<Inner>>,
}

impl MockChain {
    pub fn new(owner: Address) -> Self {
        let chain = Self::default();
        chain.inner.lock().owner = owner;
        chain
    }

    /// Mines a `buyCoffee` call in a new block, without notifying watchers.
    pub fn seed(&self, from: Address, name: &str, message: &str, value: U256) -> MemoEvent {
        let mut inner = self.inner.lock();
        inner.block += 1;
        let event = MemoEvent {
            memo: Memo {
                from,
                name: name.to_string(),
                message: message.to_string(),
                timestamp: 1_700_000_000 + inner.block,
            },
            block_number: Some(inner.block),
            transaction_hash: Some(B256::with_last_byte(inner.block as u8)),
            log_index: Some(0),
        };
        inner.memos.push(event.clone());
        inner.balance += value;
        event
    }

    /// Delivers `event` to every watcher.
    pub fn emit(&self, event: MemoEvent) {
        self.inner.lock().watchers.retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }

    pub fn fail(&self, call: Call) {
        self.inner.lock().failing.push(call);
    }

    pub fn heal(&self) {
        self.inner.lock().failing.clear();
    }

    pub fn balance(&self) -> U256 {
        self.inner.lock().balance
    }

    pub fn watchers(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.watchers.retain(|tx| !tx.is_closed());
        inner.watchers.len()
    }

    pub fn wallet(&self, account: Address) -> MockWallet {
        MockWallet {
            chain: self.clone(),
            accounts: vec![account],
            chain_id: SEPOLIA_CHAIN_ID,
            reject: false,
        }
    }

    fn check(&self, call: Call) -> Result<()> {
        if self.inner.lock().failing.contains(&call) {
            return Err(TipJarError::Network(format!("{call:?} call failed")));
        }
        Ok(())
    }

    fn confirmation(&self) -> Confirmation {
        let block = self.inner.lock().block;
        Confirmation {
            tx_hash: B256::with_last_byte(block as u8),
            block_number: Some(block),
            gas_used: 21_000,
        }
    }
}

#[async_trait]
impl ContractReader for MockChain {
    async fn block_number(&self) -> Result<u64> {
        Ok(self.inner.lock().block)
    }

    async fn memos(&self, block: BlockId) -> Result<Vec<Memo>> {
        self.check(Call::Memos)?;
        let inner = self.inner.lock();
        let at = block.as_u64().unwrap_or(inner.block);
        Ok(inner
            .memos
            .iter()
            .filter(|event| event.block_number.is_some_and(|mined| mined <= at))
            .map(|event| event.memo.clone())
            .collect())
    }

    async fn owner(&self, _block: BlockId) -> Result<Address> {
        self.check(Call::Owner)?;
        Ok(self.inner.lock().owner)
    }

    /// Always the current balance; history is not kept.
    async fn balance(&self, _block: BlockId) -> Result<U256> {
        self.check(Call::Balance)?;
        Ok(self.inner.lock().balance)
    }

    async fn watch_memos(&self) -> Result<BoxStream<'static, MemoEvent>> {
        let (tx, rx) = mpsc::unbounded();
        self.inner.lock().watchers.push(tx);
        Ok(rx.boxed())
    }
}

/// A wallet signing against a [`MockChain`].
#[derive(Clone, Debug)]
pub struct MockWallet {
    chain: MockChain,
    accounts: Vec<Address>,
    chain_id: u64,
    reject: bool,
}

impl MockWallet {
    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn without_accounts(mut self) -> Self {
        self.accounts.clear();
        self
    }

    /// Makes the user reject every signing request.
    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    fn sender(&self) -> Result<Address> {
        if self.reject {
            return Err(TipJarError::Transaction("user rejected the request".into()));
        }
        self.accounts.first().copied().ok_or(TipJarError::WalletAbsent)
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn buy_coffee(&self, tip: &Tip) -> Result<Confirmation> {
        let from = self.sender()?;
        tokio::task::yield_now().await;
        let event = self.chain.seed(from, &tip.name, &tip.message, tip.value);
        self.chain.emit(event);
        Ok(self.chain.confirmation())
    }

    async fn withdraw_tips(&self) -> Result<Confirmation> {
        let from = self.sender()?;
        tokio::task::yield_now().await;
        {
            let mut inner = self.chain.inner.lock();
            if from != inner.owner {
                return Err(TipJarError::Transaction("execution reverted".into()));
            }
            inner.block += 1;
            inner.balance = U256::ZERO;
        }
        Ok(self.chain.confirmation())
    }
}

/// Keeps every alert in memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts so far, oldest first.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.alerts.lock().last().cloned()
    }
}

impl Notifier for Recorder {
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}
