use async_trait::async_trait;
use bourse_core::{MarginAssessment, OrderId, OrderStatus, Price, Quantity, Timestamp};
use serde::Serialize;
use uuid::Uuid;

/// Outcome recorded for an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    Accepted,
    Rejected,
    Error,
}

/// Structured audit trail entry for order admission
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor: String,
    pub role: String,
    pub instrument: String,
    pub order_id: Option<OrderId>,
    pub status: Option<OrderStatus>,
    pub outcome: AuditOutcome,
    pub reason: Option<String>,
    pub assessment: Option<MarginAssessment>,
    pub requested_quantity: Quantity,
    pub requested_price: Option<Price>,
    pub recorded_at: Timestamp,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord);
}
