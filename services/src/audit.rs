// services/src/audit.rs

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::context::RequestContext;
use models::{
    redact_phi, ActorRole, AuditAction, AuditRecord, AuditResource, AuditStatus, DomainResult,
};
use storage::AuditStore;

/// What one orchestrator step observed, before it becomes an immutable
/// [`AuditRecord`].
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub actor_id: String,
    pub actor_role: ActorRole,
    pub action: AuditAction,
    pub resource_type: AuditResource,
    pub resource_id: Option<Uuid>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub description: String,
    pub status: AuditStatus,
}

/// Append-only recorder of authorization decisions and mutation outcomes.
///
/// The write is best-effort with respect to the caller's already-decided
/// result: the primary mutation has committed by the time `record` runs, and
/// a failed ledger append must not retroactively fail it. The failure is
/// surfaced on the operational log only, which leaves a gap in the
/// compliance trail. That availability-over-completeness tradeoff is
/// deliberate and documented, not hidden.
#[derive(Clone)]
pub struct AuditLedger {
    store: Arc<dyn AuditStore>,
}

impl AuditLedger {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        AuditLedger { store }
    }

    /// Appends one record. Never returns an error and never panics; the
    /// caller's outcome is already decided.
    pub async fn record(&self, ctx: &RequestContext, entry: AuditEntry) {
        let record = AuditRecord {
            id: Uuid::new_v4(),
            actor_id: entry.actor_id,
            actor_role: entry.actor_role,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            old_values: entry.old_values,
            new_values: entry.new_values,
            ip_address: ctx.ip_address.clone(),
            correlation_id: Some(ctx.correlation_id.clone()),
            description: entry.description,
            status: entry.status,
            created_at: Utc::now(),
        };
        match self.store.append(&record).await {
            Ok(()) => {
                tracing::info!(
                    actor_id = %record.actor_id,
                    action = %record.action,
                    resource_type = %record.resource_type,
                    status = ?record.status,
                    correlation_id = %ctx.correlation_id,
                    "audit record appended"
                );
            }
            Err(err) => {
                // The ledger write itself failed, so the gap can only be
                // reported operationally. PHI is masked on this channel.
                tracing::error!(
                    error = %err,
                    actor_id = %record.actor_id,
                    action = %record.action,
                    description = %redact_phi(&record.description),
                    correlation_id = %ctx.correlation_id,
                    "failed to append audit record"
                );
            }
        }
    }

    /// Newest-first trail for one actor, for compliance reporting.
    pub async fn recent_by_actor(
        &self,
        actor_id: &str,
        limit: usize,
    ) -> DomainResult<Vec<AuditRecord>> {
        Ok(self.store.recent_by_actor(actor_id, limit).await?)
    }

    /// Newest-first trail for one resource type.
    pub async fn recent_by_resource(
        &self,
        resource_type: AuditResource,
        limit: usize,
    ) -> DomainResult<Vec<AuditRecord>> {
        Ok(self.store.recent_by_resource(resource_type, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::{InMemoryStore, StoreError, StoreResult};

    struct FailingAuditStore;

    #[async_trait]
    impl AuditStore for FailingAuditStore {
        async fn append(&self, _record: &AuditRecord) -> StoreResult<()> {
            Err(StoreError::Corrupt { tree: "audit_records", detail: "disk full".to_string() })
        }

        async fn recent_by_actor(
            &self,
            _actor_id: &str,
            _limit: usize,
        ) -> StoreResult<Vec<AuditRecord>> {
            Ok(Vec::new())
        }

        async fn recent_by_resource(
            &self,
            _resource_type: AuditResource,
            _limit: usize,
        ) -> StoreResult<Vec<AuditRecord>> {
            Ok(Vec::new())
        }
    }

    fn entry() -> AuditEntry {
        AuditEntry {
            actor_id: "a1".to_string(),
            actor_role: ActorRole::Patient,
            action: AuditAction::View,
            resource_type: AuditResource::Appointment,
            resource_id: None,
            old_values: None,
            new_values: None,
            description: "viewed".to_string(),
            status: AuditStatus::Success,
        }
    }

    #[tokio::test]
    async fn should_swallow_append_failures() {
        let ledger = AuditLedger::new(Arc::new(FailingAuditStore));
        // Must not panic or propagate; the primary outcome stands.
        ledger.record(&RequestContext::new("corr-1"), entry()).await;
    }

    #[tokio::test]
    async fn should_stamp_context_onto_the_record() {
        let store = InMemoryStore::new();
        let ledger = AuditLedger::new(Arc::new(store.clone()));
        let ctx = RequestContext::new("corr-9").with_ip("10.0.0.7");
        ledger.record(&ctx, entry()).await;

        let trail = store.audit_trail().await;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].correlation_id.as_deref(), Some("corr-9"));
        assert_eq!(trail[0].ip_address.as_deref(), Some("10.0.0.7"));
    }
}
