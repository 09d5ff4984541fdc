use async_trait::async_trait;
use bourse_ports::{AuditOutcome, AuditRecord, AuditSink};
use parking_lot::RwLock;
use std::sync::Arc;

/// Writes audit records as structured `tracing` events on the `audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) {
        let assessment = record
            .assessment
            .as_ref()
            .and_then(|a| serde_json::to_string(a).ok());
        let order_id = record.order_id.map(|id| id.to_string());
        let status = record.status.map(|s| s.as_str());
        let price = record.requested_price.map(|p| p.to_string());

        match record.outcome {
            AuditOutcome::Accepted => tracing::info!(
                target: "audit",
                audit_id = %record.id,
                actor = %record.actor,
                role = %record.role,
                instrument = %record.instrument,
                order_id = order_id.as_deref(),
                status,
                outcome = "ACCEPTED",
                quantity = %record.requested_quantity,
                price = price.as_deref(),
                assessment = assessment.as_deref(),
                "order admission"
            ),
            AuditOutcome::Rejected | AuditOutcome::Error => tracing::warn!(
                target: "audit",
                audit_id = %record.id,
                actor = %record.actor,
                role = %record.role,
                instrument = %record.instrument,
                order_id = order_id.as_deref(),
                status,
                outcome = ?record.outcome,
                reason = record.reason.as_deref(),
                quantity = %record.requested_quantity,
                price = price.as_deref(),
                assessment = assessment.as_deref(),
                "order admission"
            ),
        }
    }
}

/// Keeps audit records in memory so they can be inspected
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Clone for InMemoryAuditLog {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    async fn record(&self, record: AuditRecord) {
        self.records.write().push(record);
    }
}
