use crate::abi::IBuyMeACoffee;
use alloy_primitives::{Address, B256, U256};
use alloy_rpc_types::Log;
use serde::Serialize;

/// A recorded tip, as emitted by the contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Memo {
    pub from: Address,
    pub name: String,
    pub message: String,
    /// Seconds since the unix epoch.
    pub timestamp: u64,
}

impl From<IBuyMeACoffee::Memo> for Memo {
    fn from(memo: IBuyMeACoffee::Memo) -> Self {
        let IBuyMeACoffee::Memo { from, name, message, timestamp } = memo;
        Self { from, name, message, timestamp: timestamp.saturating_to() }
    }
}

impl From<IBuyMeACoffee::NewMemo> for Memo {
    fn from(event: IBuyMeACoffee::NewMemo) -> Self {
        let IBuyMeACoffee::NewMemo { from, name, message, timestamp } = event;
        Self { from, name, message, timestamp: timestamp.saturating_to() }
    }
}

/// A `NewMemo` event together with the log position it was emitted at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoEvent {
    pub memo: Memo,
    /// `None` for logs from pending blocks.
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub log_index: Option<u64>,
}

impl MemoEvent {
    /// Pairs a decoded `NewMemo` with the position of the log it was decoded from.
    pub fn new(event: IBuyMeACoffee::NewMemo, log: &Log) -> Self {
        Self {
            memo: event.into(),
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            log_index: log.log_index,
        }
    }
}

/// Everything a single read-refresh fetches from the contract.
///
/// Produced as a whole or not at all, see [`ContractReader::fetch_state`].
///
/// [`ContractReader::fetch_state`]: crate::ContractReader::fetch_state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainState {
    /// The block all three values were read at.
    pub block: u64,
    pub memos: Vec<Memo>,
    pub owner: Address,
    pub balance: U256,
}

/// Derived view of the contract: who receives the tips and how much is waiting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContractView {
    /// `None` until the first successful fetch.
    pub owner: Option<Address>,
    /// Contract balance in wei.
    pub balance: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn converts_event_and_struct() {
        let from = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let event = IBuyMeACoffee::NewMemo {
            from,
            name: "alice".into(),
            message: "gm".into(),
            timestamp: U256::from(1_700_000_000u64),
        };
        let stored = IBuyMeACoffee::Memo {
            from,
            name: "alice".into(),
            message: "gm".into(),
            timestamp: U256::from(1_700_000_000u64),
        };
        assert_eq!(Memo::from(event), Memo::from(stored));
    }

    #[test]
    fn oversized_timestamp_saturates() {
        let memo = Memo::from(IBuyMeACoffee::Memo {
            from: Address::ZERO,
            name: String::new(),
            message: String::new(),
            timestamp: U256::MAX,
        });
        assert_eq!(memo.timestamp, u64::MAX);
    }

    #[test]
    fn event_keeps_log_position() {
        let event = IBuyMeACoffee::NewMemo {
            from: Address::ZERO,
            name: "Anonymous".into(),
            message: "Enjoy your coffee!".into(),
            timestamp: U256::from(1_700_000_000u64),
        };
        let log = Log {
            block_number: Some(7),
            transaction_hash: Some(B256::with_last_byte(1)),
            log_index: Some(3),
            ..Default::default()
        };
        let event = MemoEvent::new(event, &log);
        assert_eq!(event.block_number, Some(7));
        assert_eq!(event.log_index, Some(3));
        assert_eq!(event.memo.name, "Anonymous");
    }
}
