//! Workflow module for the IronEclipse core.
//!
//! This module implements the order lifecycle rules: which actor may move
//! an order from one status to the next, what each transition stamps, and
//! how SLA deadlines are judged. The engine itself is pure; the service
//! wrapper adds audit emission for every successful transition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eclipse_types::{Actor, AuditLogEntry, Order, OrderAction, OrderStatus, Role};
use std::sync::Arc;
use thiserror::Error;

pub mod engine;
pub mod sla;

pub use engine::{admin_override, apply_action, Transition};

/// Errors that can occur while applying workflow actions.
#[derive(Debug, Error)]
pub enum WorkflowError {
	/// Error that occurs when the transition table has no row for the
	/// attempted action in the order's current status.
	#[error("No transition for action '{action}' from status {status} (actor role: {role})")]
	InvalidTransition {
		status: OrderStatus,
		action: OrderAction,
		role: Role,
	},
	/// Error that occurs when the row exists but the actor fails its
	/// role or identity requirement.
	#[error("Role {role} is not authorized to perform '{operation}' on this order")]
	Unauthorized { operation: String, role: Role },
}

/// Errors that can occur while recording audit entries.
#[derive(Debug, Error)]
pub enum AuditError {
	/// Error from the sink backing the audit log.
	#[error("Audit sink error: {0}")]
	Sink(String),
}

/// Collaborator receiving one entry per successful mutation.
///
/// Recording is best-effort: a failing sink must never roll back the
/// transition it describes.
#[async_trait]
pub trait AuditSink: Send + Sync {
	/// Appends an entry to the log.
	async fn record(&self, entry: AuditLogEntry) -> Result<(), AuditError>;
}

/// Applies workflow actions and emits audit entries for the ones that
/// succeed.
///
/// The service never persists orders itself; callers hand the returned
/// order to the repository, keeping the engine free of storage concerns.
pub struct WorkflowService {
	audit: Arc<dyn AuditSink>,
}

impl WorkflowService {
	pub fn new(audit: Arc<dyn AuditSink>) -> Self {
		Self { audit }
	}

	/// Validates and applies a transition-table action.
	///
	/// On success the updated order is returned and one audit entry is
	/// emitted. On rejection the input order is untouched and nothing is
	/// recorded.
	pub async fn apply_action(
		&self,
		order: &Order,
		action: OrderAction,
		actor: &Actor,
		now: DateTime<Utc>,
	) -> Result<Order, WorkflowError> {
		let transition = engine::apply_action(order, action, actor, now)?;
		self.emit(&transition, actor, now).await;
		Ok(transition.order)
	}

	/// Sets an order's status directly, bypassing the transition table.
	///
	/// Admin-only escape hatch used by the order edit path. Stamps no
	/// stage timestamps; the override is audited under its own tag so it
	/// stays visible in the log.
	pub async fn override_status(
		&self,
		order: &Order,
		new_status: OrderStatus,
		actor: &Actor,
		now: DateTime<Utc>,
	) -> Result<Order, WorkflowError> {
		let transition = engine::admin_override(order, new_status, actor, now)?;
		self.emit(&transition, actor, now).await;
		Ok(transition.order)
	}

	async fn emit(&self, transition: &Transition, actor: &Actor, now: DateTime<Utc>) {
		let entry = AuditLogEntry::new(
			now,
			actor.name.clone(),
			transition.action,
			transition.detail.clone(),
			transition.order.id.clone(),
		);
		if let Err(err) = self.audit.record(entry).await {
			tracing::warn!(
				order_id = %transition.order.id,
				error = %err,
				"audit emission failed, transition kept"
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::tests_support::{order_with_status, provider};
	use eclipse_types::AuditAction;
	use tokio::sync::Mutex;

	struct MemorySink {
		entries: Mutex<Vec<AuditLogEntry>>,
	}

	impl MemorySink {
		fn new() -> Self {
			Self {
				entries: Mutex::new(Vec::new()),
			}
		}
	}

	#[async_trait]
	impl AuditSink for MemorySink {
		async fn record(&self, entry: AuditLogEntry) -> Result<(), AuditError> {
			self.entries.lock().await.push(entry);
			Ok(())
		}
	}

	struct FailingSink;

	#[async_trait]
	impl AuditSink for FailingSink {
		async fn record(&self, _entry: AuditLogEntry) -> Result<(), AuditError> {
			Err(AuditError::Sink("sink offline".into()))
		}
	}

	#[tokio::test]
	async fn test_successful_transition_is_audited() {
		let sink = Arc::new(MemorySink::new());
		let service = WorkflowService::new(sink.clone());
		let order = order_with_status(OrderStatus::Created, true);

		let updated = service
			.apply_action(&order, OrderAction::Accept, &provider("P1"), Utc::now())
			.await
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Accepted);

		let entries = sink.entries.lock().await;
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].action, AuditAction::OrderStatusChanged);
		assert_eq!(entries[0].entity_id, order.id);
	}

	#[tokio::test]
	async fn test_rejected_transition_is_not_audited() {
		let sink = Arc::new(MemorySink::new());
		let service = WorkflowService::new(sink.clone());
		let order = order_with_status(OrderStatus::Delivered, true);

		let result = service
			.apply_action(&order, OrderAction::Accept, &provider("P1"), Utc::now())
			.await;
		assert!(result.is_err());
		assert!(sink.entries.lock().await.is_empty());
	}

	#[tokio::test]
	async fn test_sink_failure_does_not_fail_transition() {
		let service = WorkflowService::new(Arc::new(FailingSink));
		let order = order_with_status(OrderStatus::Created, true);

		let updated = service
			.apply_action(&order, OrderAction::Accept, &provider("P1"), Utc::now())
			.await
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Accepted);
	}
}
