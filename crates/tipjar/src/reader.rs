//! Read-only access to the contract.

use crate::{
    ChainState, Memo, MemoEvent, MemoSubscription, Result, TipJarError,
    abi::IBuyMeACoffee::{self, IBuyMeACoffeeInstance},
};
use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{BlockId, Log};
use async_trait::async_trait;
use futures::{StreamExt, future, stream::BoxStream};
use tipjar_config::{CONTRACT_ADDRESS, Config};

/// The read side of the contract.
///
/// Implementors only provide the individual calls; [`fetch_state`](Self::fetch_state) and
/// [`subscribe`](Self::subscribe) are built on top of them.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// The latest block number, used to probe the connection.
    async fn block_number(&self) -> Result<u64>;

    /// All memos recorded up to `block`, oldest first.
    async fn memos(&self, block: BlockId) -> Result<Vec<Memo>>;

    /// The address tips are withdrawn to.
    async fn owner(&self, block: BlockId) -> Result<Address>;

    /// The contract's balance in wei.
    async fn balance(&self, block: BlockId) -> Result<U256>;

    /// A stream of `NewMemo` events emitted after the call.
    async fn watch_memos(&self) -> Result<BoxStream<'static, MemoEvent>>;

    /// Fetches memos, owner and balance concurrently, all at the latest block.
    ///
    /// Fails as a whole if any of the calls fails.
    async fn fetch_state(&self) -> Result<ChainState> {
        let block = self.block_number().await?;
        let at = BlockId::number(block);
        let (memos, owner, balance) =
            tokio::try_join!(self.memos(at), self.owner(at), self.balance(at))?;
        debug!(block, memos = memos.len(), %owner, %balance, "fetched contract state");
        Ok(ChainState { block, memos, owner, balance })
    }

    /// Registers a `NewMemo` listener. Dropping the returned handle unregisters it.
    async fn subscribe(&self) -> Result<MemoSubscription> {
        let events = self.watch_memos().await?;
        Ok(MemoSubscription::spawn(events))
    }
}

/// Unauthenticated client talking to the contract through a hosted RPC endpoint.
#[derive(Clone, Debug)]
pub struct ReadOnlyClient {
    provider: DynProvider,
    contract: IBuyMeACoffeeInstance<DynProvider>,
}

impl ReadOnlyClient {
    /// Connects to the configured endpoint and probes it with `eth_blockNumber`.
    ///
    /// A missing API key, an invalid URL and an unreachable endpoint all fail with
    /// [`TipJarError::Network`]. The connection is not retried.
    pub async fn connect(config: &Config) -> Result<Self> {
        let url = config.rpc_endpoint().map_err(TipJarError::network)?;
        debug!(endpoint = %config.redacted_rpc_endpoint(), "connecting read-only provider");
        let provider = ProviderBuilder::new().connect_http(url).erased();
        let client = Self::new(provider, CONTRACT_ADDRESS);
        let block = client.block_number().await?;
        debug!(block, "connected to network");
        Ok(client)
    }

    /// Wraps an existing provider without probing it.
    fn new(provider: DynProvider, address: Address) -> Self {
        let contract = IBuyMeACoffee::new(address, provider.clone());
        Self { provider, contract }
    }

    fn address(&self) -> Address {
        *self.contract.address()
    }
}

#[async_trait]
impl ContractReader for ReadOnlyClient {
    async fn block_number(&self) -> Result<u64> {
        self.provider.get_block_number().await.map_err(TipJarError::network)
    }

    async fn memos(&self, block: BlockId) -> Result<Vec<Memo>> {
        let memos =
            self.contract.getMemos().block(block).call().await.map_err(TipJarError::network)?;
        Ok(memos.into_iter().map(Memo::from).collect())
    }

    async fn owner(&self, block: BlockId) -> Result<Address> {
        self.contract.owner().block(block).call().await.map_err(TipJarError::network)
    }

    async fn balance(&self, block: BlockId) -> Result<U256> {
        self.provider
            .get_balance(self.address())
            .block_id(block)
            .await
            .map_err(TipJarError::network)
    }

    async fn watch_memos(&self) -> Result<BoxStream<'static, MemoEvent>> {
        let poller = self.contract.NewMemo_filter().watch().await.map_err(TipJarError::network)?;
        let stream = poller.into_stream().filter_map(|item| future::ready(memo_event(item)));
        Ok(stream.boxed())
    }
}

/// Logs and skips `NewMemo` logs that fail to decode.
fn memo_event(
    item: alloy_sol_types::Result<(IBuyMeACoffee::NewMemo, Log)>,
) -> Option<MemoEvent> {
    match item {
        Ok((event, log)) => Some(MemoEvent::new(event, &log)),
        Err(err) => {
            warn!(%err, "failed to decode NewMemo log");
            None
        }
    }
}
