use bourse_core::TradingEvent;
use bourse_ports::{
    AuditSink, Clock, InstrumentRepository, MarginRuleRepository, NotificationPublisher,
    PriceOracle, TradingStore,
};
use std::sync::Arc;

use super::AccountLocks;
use crate::config::SettlementConfig;

/// Collaborators shared by every use case
#[derive(Clone)]
pub struct TradingContext {
    pub clock: Arc<dyn Clock>,
    pub store: Arc<dyn TradingStore>,
    pub instruments: Arc<dyn InstrumentRepository>,
    pub margin_rules: Arc<dyn MarginRuleRepository>,
    pub oracle: Arc<dyn PriceOracle>,
    pub notifier: Arc<dyn NotificationPublisher>,
    pub audit: Arc<dyn AuditSink>,
    pub locks: Arc<AccountLocks>,
    pub config: SettlementConfig,
}

impl TradingContext {
    /// Publish an event; delivery failures are logged and swallowed
    pub async fn notify(&self, event: TradingEvent) {
        let account_id = event.account_id();
        let order_id = event.order().id;
        if let Err(e) = self.notifier.publish(account_id, event).await {
            tracing::warn!(%account_id, %order_id, error = %e, "notification failed");
        }
    }
}
