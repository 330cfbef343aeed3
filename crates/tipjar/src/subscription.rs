use crate::MemoEvent;
use futures::{StreamExt, stream::BoxStream};
use tokio::{sync::mpsc, task::JoinHandle};

/// A live `NewMemo` listener.
///
/// Events are forwarded from the underlying stream by a background task, in arrival order and
/// exactly once each. The listener is torn down when the handle is dropped or
/// [`unsubscribe`](Self::unsubscribe)d, so no handler outlives the session that registered it.
#[derive(Debug)]
pub struct MemoSubscription {
    rx: mpsc::UnboundedReceiver<MemoEvent>,
    task: JoinHandle<()>,
}

impl MemoSubscription {
    /// Spawns the forwarding task for `events` on the current tokio runtime.
    pub fn spawn(mut events: BoxStream<'static, MemoEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                trace!(from = %event.memo.from, block = ?event.block_number, "received NewMemo");
                if tx.send(event).is_err() {
                    break;
                }
            }
            debug!("NewMemo stream ended");
        });
        Self { rx, task }
    }

    /// Waits for the next event. Returns `None` once the event stream has ended.
    pub async fn recv(&mut self) -> Option<MemoEvent> {
        self.rx.recv().await
    }

    /// Stops the listener and discards undelivered memos.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for MemoSubscription {
    fn drop(&mut self) {
        self.task.abort();
        self.rx.close();
        debug!("unsubscribed from NewMemo");
    }
}
