use async_trait::async_trait;
use bourse_core::{AccountId, TradingEvent};
use bourse_ports::{NotificationError, NotificationPublisher};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast-based notification publisher
///
/// Every event goes to the global channel and, when someone listens, to the
/// channel of the account it belongs to. No subscriber is not an error.
pub struct BroadcastNotificationPublisher {
    global_tx: broadcast::Sender<TradingEvent>,
    account_channels: Arc<DashMap<AccountId, broadcast::Sender<TradingEvent>>>,
    capacity: usize,
}

impl BroadcastNotificationPublisher {
    pub fn new(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity);

        BroadcastNotificationPublisher {
            global_tx,
            account_channels: Arc::new(DashMap::new()),
            capacity,
        }
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<TradingEvent> {
        self.global_tx.subscribe()
    }

    /// Subscribe to events of one trading account
    pub fn subscribe_account(&self, account_id: AccountId) -> broadcast::Receiver<TradingEvent> {
        self.account_channels
            .entry(account_id)
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(self.capacity);
                tx
            })
            .subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.global_tx.receiver_count()
            + self
                .account_channels
                .iter()
                .map(|tx| tx.receiver_count())
                .sum::<usize>()
    }
}

impl Default for BroadcastNotificationPublisher {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl Clone for BroadcastNotificationPublisher {
    fn clone(&self) -> Self {
        BroadcastNotificationPublisher {
            global_tx: self.global_tx.clone(),
            account_channels: Arc::clone(&self.account_channels),
            capacity: self.capacity,
        }
    }
}

#[async_trait]
impl NotificationPublisher for BroadcastNotificationPublisher {
    async fn publish(
        &self,
        account_id: AccountId,
        event: TradingEvent,
    ) -> Result<(), NotificationError> {
        if let Some(tx) = self.account_channels.get(&account_id) {
            let _ = tx.send(event.clone());
        }
        // Ignore send errors (no subscribers)
        let _ = self.global_tx.send(event);
        Ok(())
    }
}
