//! Application state and its transitions.
//!
//! [`AppState`] is never mutated in place: every change goes through [`AppState::reduce`], which
//! consumes the current state and returns the next one.

use crate::{ChainState, ContractView, Memo, MemoEvent, SessionStatus};
use alloy_primitives::{Address, U256};
use tipjar_config::SEPOLIA_CHAIN_ID;

/// The kind of transaction awaiting confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Tip,
    Withdrawal,
}

/// Everything the frontend displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppState {
    pub session: SessionStatus,
    pub memos: Vec<Memo>,
    pub view: ContractView,
    /// Set while a transaction is in flight.
    pub pending: Option<Submission>,
    /// The block the memos were last fetched at.
    synced_block: Option<u64>,
    expected_chain_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SEPOLIA_CHAIN_ID)
    }
}

/// A state transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// A full read-refresh completed; replaces memos, owner and balance together.
    Loaded(ChainState),
    /// A `NewMemo` event arrived.
    MemoReceived(MemoEvent),
    BalanceUpdated(U256),
    Connecting,
    Connected { account: Address, chain_id: u64 },
    ConnectFailed,
    Disconnected,
    Submitted(Submission),
    Settled,
}

impl AppState {
    /// An empty state that only accepts sessions on `expected_chain_id`.
    pub fn new(expected_chain_id: u64) -> Self {
        Self {
            session: SessionStatus::Disconnected,
            memos: Vec::new(),
            view: ContractView::default(),
            pending: None,
            synced_block: None,
            expected_chain_id,
        }
    }

    pub fn expected_chain_id(&self) -> u64 {
        self.expected_chain_id
    }

    /// Applies `action`, returning the next state.
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        trace!(?action, "reduce");
        match action {
            Action::Loaded(ChainState { block, memos, owner, balance }) => {
                self.memos = memos;
                self.view = ContractView { owner: Some(owner), balance };
                self.synced_block = Some(block);
            }
            Action::MemoReceived(event) => {
                if self.is_synced(&event) {
                    debug!(block = ?event.block_number, "memo already fetched");
                } else {
                    self.memos.push(event.memo);
                }
            }
            Action::BalanceUpdated(balance) => self.view.balance = balance,
            Action::Connecting => {
                if !self.session.is_connected() {
                    self.session = SessionStatus::Connecting;
                }
            }
            Action::Connected { account, chain_id } => {
                self.session = if chain_id == self.expected_chain_id {
                    SessionStatus::Connected { account, chain_id }
                } else {
                    warn!(chain_id, expected = self.expected_chain_id, "refusing session");
                    SessionStatus::Disconnected
                };
            }
            Action::ConnectFailed => {
                if self.session == SessionStatus::Connecting {
                    self.session = SessionStatus::Disconnected;
                }
            }
            Action::Disconnected => self.session = SessionStatus::Disconnected,
            Action::Submitted(submission) => self.pending = Some(submission),
            Action::Settled => self.pending = None,
        }
        self
    }

    /// Returns `true` if `event` was mined at or before the block of the last fetch, so its memo
    /// is already listed.
    fn is_synced(&self, event: &MemoEvent) -> bool {
        matches!(
            (event.block_number, self.synced_block),
            (Some(block), Some(synced)) if block <= synced
        )
    }

    /// Returns `true` if writes are allowed: connected on the expected chain.
    pub fn can_write(&self) -> bool {
        matches!(
            self.session,
            SessionStatus::Connected { chain_id, .. } if chain_id == self.expected_chain_id
        )
    }

    /// Returns `true` if the connected account is the contract owner.
    ///
    /// For display only; the contract is the one enforcing ownership.
    pub fn is_owner(&self) -> bool {
        matches!(
            (self.session.account(), self.view.owner),
            (Some(account), Some(owner)) if account == owner
        )
    }
}
