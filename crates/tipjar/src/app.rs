//! The frontend driver.
//!
//! [`TipJar`] glues a [`ContractReader`], an optional [`WalletSession`] and the [`AppState`]
//! together, turning user intents into contract calls and every failure into an alert.

use crate::{
    Action, AppState, Confirmation, ContractReader, MemoEvent, MemoSubscription, Notifier, Result,
    Submission, Tip, TipJarError, Wallet, WalletSession,
};
use alloy_rpc_types::BlockId;
use futures::{FutureExt, future::BoxFuture};
use std::mem;

/// Alert shown when the very first fetch fails.
pub const LOAD_FAILED: &str = "Failed to load initial data. See logs for details.";

/// A submitted transaction waiting to be mined.
///
/// The future does not borrow the driver, so the caller can keep handling events while it runs
/// and hand the outcome back to [`TipJar::settle`].
pub type PendingTransaction = BoxFuture<'static, TxOutcome>;

/// The result of a [`PendingTransaction`].
#[derive(Debug)]
pub struct TxOutcome {
    pub submission: Submission,
    pub result: Result<Confirmation>,
}

pub struct TipJar<R, W> {
    reader: R,
    session: Option<WalletSession<W>>,
    state: AppState,
    notifier: Box<dyn Notifier>,
}

impl<R, W> std::fmt::Debug for TipJar<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipJar").field("state", &self.state).finish_non_exhaustive()
    }
}

impl<R: ContractReader, W: Wallet + Clone + 'static> TipJar<R, W> {
    pub fn new(reader: R, notifier: impl Notifier + 'static) -> Self {
        Self { reader, session: None, state: AppState::default(), notifier: Box::new(notifier) }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> Option<&WalletSession<W>> {
        self.session.as_ref()
    }

    fn dispatch(&mut self, action: Action) {
        self.state = mem::take(&mut self.state).reduce(action);
    }

    /// Logs `err` and alerts the user.
    pub fn report(&self, context: &str, err: &TipJarError) {
        error!(%err, "{context}");
        self.notifier.alert(err.alert());
    }

    /// Initial fetch of memos, owner and balance.
    ///
    /// On failure the state is left untouched and the user is alerted.
    pub async fn load(&mut self) -> bool {
        match self.reader.fetch_state().await {
            Ok(chain) => {
                self.dispatch(Action::Loaded(chain));
                true
            }
            Err(err) => {
                error!(%err, "failed to load initial data");
                self.notifier.alert(LOAD_FAILED);
                false
            }
        }
    }

    /// Refetches memos, owner and balance, replacing all three at once.
    pub async fn refresh(&mut self) -> bool {
        match self.reader.fetch_state().await {
            Ok(chain) => {
                self.dispatch(Action::Loaded(chain));
                true
            }
            Err(err) => {
                self.report("failed to refresh contract state", &err);
                false
            }
        }
    }

    pub async fn refresh_balance(&mut self) -> bool {
        match self.reader.balance(BlockId::latest()).await {
            Ok(balance) => {
                self.dispatch(Action::BalanceUpdated(balance));
                true
            }
            Err(err) => {
                self.report("failed to fetch contract balance", &err);
                false
            }
        }
    }

    /// Registers the `NewMemo` listener. Feed its events to [`on_memo`](Self::on_memo).
    pub async fn subscribe(&self) -> Result<MemoSubscription> {
        self.reader.subscribe().await.inspect_err(|err| self.report("failed to subscribe", err))
    }

    /// Appends the memo of an event delivered by the listener, then refreshes the balance.
    ///
    /// Events mined at or before the block of the last fetch are already listed and skipped.
    pub async fn on_memo(&mut self, event: MemoEvent) {
        info!(from = %event.memo.from, name = %event.memo.name, "new memo");
        self.dispatch(Action::MemoReceived(event));
        self.refresh_balance().await;
    }

    /// Connects `wallet` and, on success, refreshes everything.
    ///
    /// A failed attempt keeps any session that was already established.
    pub async fn connect(&mut self, wallet: Option<W>) -> bool {
        self.dispatch(Action::Connecting);
        match WalletSession::connect(wallet, self.state.expected_chain_id()).await {
            Ok(session) => {
                self.dispatch(Action::Connected {
                    account: session.account(),
                    chain_id: session.chain_id(),
                });
                info!(account = %session.account(), "wallet connected");
                self.session = Some(session);
                self.refresh().await;
                true
            }
            Err(err) => {
                self.dispatch(Action::ConnectFailed);
                self.report("failed to connect wallet", &err);
                false
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.session = None;
        self.dispatch(Action::Disconnected);
    }

    /// The session to write with, if writes are currently allowed.
    fn writable(&self) -> Result<WalletSession<W>> {
        if self.state.pending.is_some() {
            return Err(TipJarError::TransactionPending);
        }
        match &self.session {
            Some(session) if self.state.can_write() => Ok(session.clone()),
            _ => Err(TipJarError::NotConnected),
        }
    }

    /// Submits a tip. Empty fields fall back to the defaults.
    ///
    /// Returns `None`, after alerting, if there is no usable session or another transaction is
    /// still pending.
    pub fn begin_tip(&mut self, name: &str, message: &str) -> Option<PendingTransaction> {
        let session = self.writable().inspect_err(|err| self.report("cannot send tip", err)).ok()?;
        let tip = Tip::new(name, message);
        self.dispatch(Action::Submitted(Submission::Tip));
        Some(
            async move {
                let result = session.send_tip(&tip).await;
                TxOutcome { submission: Submission::Tip, result }
            }
            .boxed(),
        )
    }

    /// Submits a withdrawal of the whole contract balance to the owner.
    pub fn begin_withdraw(&mut self) -> Option<PendingTransaction> {
        let session =
            self.writable().inspect_err(|err| self.report("cannot withdraw tips", err)).ok()?;
        self.dispatch(Action::Submitted(Submission::Withdrawal));
        Some(
            async move {
                let result = session.withdraw().await;
                TxOutcome { submission: Submission::Withdrawal, result }
            }
            .boxed(),
        )
    }

    /// Applies the outcome of a [`PendingTransaction`].
    ///
    /// Success alerts the user and refreshes everything; failure alerts with the classified
    /// error.
    pub async fn settle(&mut self, outcome: TxOutcome) -> Option<Confirmation> {
        self.dispatch(Action::Settled);
        let TxOutcome { submission, result } = outcome;
        match result {
            Ok(confirmation) => {
                info!(?submission, tx_hash = %confirmation.tx_hash, "transaction mined");
                self.notifier.alert(match submission {
                    Submission::Tip => "Coffee sent!",
                    Submission::Withdrawal => "Tips withdrawn to your wallet!",
                });
                self.refresh().await;
                Some(confirmation)
            }
            Err(err) => {
                let err = match submission {
                    Submission::Tip => err,
                    Submission::Withdrawal => self.classify_withdrawal(err),
                };
                self.report("transaction failed", &err);
                None
            }
        }
    }

    /// A failed withdrawal from anyone but the known owner is an authorization failure.
    fn classify_withdrawal(&self, err: TipJarError) -> TipJarError {
        let owner = self.state.view.owner;
        match self.state.session.account() {
            Some(caller) if Some(caller) != owner && matches!(err, TipJarError::Transaction(_)) => {
                TipJarError::Authorization { caller, owner, reason: err.to_string() }
            }
            _ => err,
        }
    }

    /// Sends a tip and waits for the outcome.
    pub async fn send_tip(&mut self, name: &str, message: &str) -> Option<Confirmation> {
        let pending = self.begin_tip(name, message)?;
        let outcome = pending.await;
        self.settle(outcome).await
    }

    /// Withdraws and waits for the outcome.
    pub async fn withdraw(&mut self) -> Option<Confirmation> {
        let pending = self.begin_withdraw()?;
        let outcome = pending.await;
        self.settle(outcome).await
    }
}
