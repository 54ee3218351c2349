//! Cooperative cancellation for running commands.
//!
//! A [`CancelSource`] and its [`CancelToken`]s share a channel that never
//! carries a message; closing it is the signal.

use async_channel::{Receiver, Sender};

/// Create a connected source and token.
pub fn pair() -> (CancelSource, CancelToken) {
    let (sender, receiver) = async_channel::bounded(1);
    let token = CancelToken {
        _sender: sender.clone(),
        receiver,
    };
    (CancelSource { sender }, token)
}

/// Fires the tokens created alongside it.
#[derive(Debug, Clone)]
pub struct CancelSource {
    sender: Sender<()>,
}

impl CancelSource {
    /// Cancel every token tied to this source. Idempotent.
    pub fn cancel(&self) {
        if self.sender.close() {
            log::debug!("cancellation requested");
        }
    }
}

/// Observes cancellation. Clones observe the same signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    // Keeps the channel open when every source has been dropped.
    _sender: Sender<()>,
    receiver: Receiver<()>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        pair().1
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.receiver.is_closed()
    }

    /// Resolves once cancellation is requested.
    pub async fn cancelled(&self) {
        while self.receiver.recv().await.is_ok() {}
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}
