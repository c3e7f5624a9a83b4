//! "Transactions changed" signal for cached views.
//!
//! The recalculator never calls this itself; whoever ran a correction pass
//! fires it when the report says corrections were applied.

use tokio::sync::broadcast;

pub trait ChangeNotifier: Send + Sync {
    fn notify_transactions_changed(&self);
}

/// Emits a log event and nothing else.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl ChangeNotifier for TracingNotifier {
    fn notify_transactions_changed(&self) {
        tracing::info!("Transaction balances changed, cached views should be invalidated");
    }
}

/// Fans the signal out to any number of in-process subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<()>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn notify_transactions_changed(&self) {
        // No subscribers is not an error.
        let receivers = self.sender.send(()).unwrap_or(0);
        tracing::debug!(receivers, "Broadcast transactions-changed signal");
    }
}
