//! # tipjar
//!
//! Client for the `BuyMeACoffee` contract on Sepolia: read memos and the contract balance,
//! follow new memos as they are emitted, send tips and withdraw them as the owner.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod abi;

mod app;
pub use app::{LOAD_FAILED, PendingTransaction, TipJar, TxOutcome};

mod error;
pub use error::{Result, TipJarError};

mod memo;
pub use memo::{ChainState, ContractView, Memo, MemoEvent};

mod notify;
pub use notify::Notifier;

mod reader;
pub use reader::{ContractReader, ReadOnlyClient};

mod session;
pub use session::{SessionStatus, WalletSession};

mod state;
pub use state::{Action, AppState, Submission};

mod subscription;
pub use subscription::MemoSubscription;

mod wallet;
pub use wallet::{
    Confirmation, DEFAULT_MESSAGE, DEFAULT_NAME, PrivateKeyError, SignerWallet, Tip, Wallet,
    parse_private_key,
};

#[cfg(test)]
mod test_utils;
