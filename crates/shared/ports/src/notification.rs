use async_trait::async_trait;
use bourse_core::{AccountId, TradingEvent};

use crate::error::NotificationError;

/// Publisher for order/execution state changes
///
/// Delivery is best-effort and keyed by trading account. Callers log
/// failures and carry on.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, account_id: AccountId, event: TradingEvent)
    -> Result<(), NotificationError>;
}
