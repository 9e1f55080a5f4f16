//! Order handler.
//!
//! Entry points the presentation layer calls for everything an order can
//! do: placement, workflow actions, administrative edits, SLA views, and
//! the per-role dashboard figures. Each mutation loads through the
//! repository, applies the engine, persists, and leaves an audit entry.

use crate::audit::AuditLog;
use crate::state::{OrderStore, OrderStoreError};
use chrono::Utc;
use eclipse_reporting::{AdminSummary, CustomerSummary, ProviderQueue};
use eclipse_types::{
	Actor, AuditAction, AuditLogEntry, DeliveryMode, ItemDraft, Order, OrderAction, OrderDraft,
	OrderStatus, Role, SlaRecord,
};
use eclipse_workflow::{sla, AuditSink, WorkflowError, WorkflowService};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Errors surfaced by order handler operations.
#[derive(Debug, Error)]
pub enum OrderFlowError {
	#[error(transparent)]
	Store(#[from] OrderStoreError),
	#[error(transparent)]
	Workflow(#[from] WorkflowError),
}

/// Handler for order placement, workflow actions, and views.
pub struct OrderHandler {
	store: Arc<OrderStore>,
	workflow: Arc<WorkflowService>,
	audit: Arc<AuditLog>,
}

impl OrderHandler {
	pub fn new(store: Arc<OrderStore>, workflow: Arc<WorkflowService>, audit: Arc<AuditLog>) -> Self {
		Self {
			store,
			workflow,
			audit,
		}
	}

	/// Places a new order for a customer.
	#[instrument(skip_all, fields(customer_id = %draft.customer_id))]
	pub async fn place_order(
		&self,
		draft: OrderDraft,
		actor: &Actor,
	) -> Result<Order, OrderFlowError> {
		let now = Utc::now();
		let order = self.store.create(draft, actor, now).await?;

		self.record(
			AuditAction::OrderPlaced,
			format!("Order {} created", order.id),
			&order.id,
			actor,
		)
		.await;
		tracing::info!(order_id = %order.id, total = %order.total_price, "order placed");
		Ok(order)
	}

	/// Applies a transition-table action and persists the result.
	///
	/// The engine emits the audit entry; rejection leaves the stored
	/// order untouched.
	#[instrument(skip_all, fields(order_id = %order_id, action = %action))]
	pub async fn apply_action(
		&self,
		order_id: &str,
		action: OrderAction,
		actor: &Actor,
	) -> Result<Order, OrderFlowError> {
		let now = Utc::now();
		let order = self.store.get(order_id).await?;
		let updated = self.workflow.apply_action(&order, action, actor, now).await?;
		let stored = self.store.update(updated).await?;

		tracing::info!(order_id = %stored.id, status = %stored.status, "order transitioned");
		Ok(stored)
	}

	/// Sets an order's status directly through the admin override path.
	#[instrument(skip_all, fields(order_id = %order_id))]
	pub async fn override_status(
		&self,
		order_id: &str,
		new_status: OrderStatus,
		actor: &Actor,
	) -> Result<Order, OrderFlowError> {
		let now = Utc::now();
		let order = self.store.get(order_id).await?;
		let updated = self
			.workflow
			.override_status(&order, new_status, actor, now)
			.await?;
		let stored = self.store.update(updated).await?;

		tracing::warn!(order_id = %stored.id, status = %stored.status, "order status overridden");
		Ok(stored)
	}

	/// Replaces an order's items, re-pricing against the rate table.
	#[instrument(skip_all, fields(order_id = %order_id))]
	pub async fn edit_items(
		&self,
		order_id: &str,
		items: &[ItemDraft],
		actor: &Actor,
	) -> Result<Order, OrderFlowError> {
		let order = self.store.edit_items(order_id, items, actor).await?;
		self.record(
			AuditAction::OrderUpdated,
			format!("Order {} items updated", order.id),
			&order.id,
			actor,
		)
		.await;
		Ok(order)
	}

	/// Switches an order's handover mode.
	#[instrument(skip_all, fields(order_id = %order_id))]
	pub async fn edit_delivery(
		&self,
		order_id: &str,
		delivery: DeliveryMode,
		actor: &Actor,
	) -> Result<Order, OrderFlowError> {
		let order = self.store.edit_delivery(order_id, delivery, actor).await?;
		self.record(
			AuditAction::OrderUpdated,
			format!("Order {} delivery changed to {}", order.id, order.delivery),
			&order.id,
			actor,
		)
		.await;
		Ok(order)
	}

	/// Fetches one order with its SLA evaluated as of now.
	pub async fn get(&self, order_id: &str) -> Result<Order, OrderFlowError> {
		let mut order = self.store.get(order_id).await?;
		order.sla = sla::evaluate_at(&order, Utc::now());
		Ok(order)
	}

	/// The orders the actor may see, SLA evaluated for display.
	pub async fn orders_for(&self, actor: &Actor) -> Result<Vec<Order>, OrderFlowError> {
		let now = Utc::now();
		let mut orders = self.store.list_scoped(actor).await?;
		for order in &mut orders {
			order.sla = sla::evaluate_at(order, now);
		}
		Ok(orders)
	}

	/// Current SLA view of one order.
	pub async fn sla_view(&self, order_id: &str) -> Result<SlaRecord, OrderFlowError> {
		let order = self.store.get(order_id).await?;
		Ok(sla::evaluate_at(&order, Utc::now()))
	}

	/// Admin KPI row over the full collection.
	pub async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminSummary, OrderFlowError> {
		self.require_role(actor, Role::Admin, "view the admin dashboard")?;
		let orders = self.orders_for(actor).await?;
		Ok(eclipse_reporting::admin_summary(&orders, Utc::now()))
	}

	/// Provider KPI row over the provider's scoped snapshot.
	pub async fn provider_dashboard(
		&self,
		actor: &Actor,
	) -> Result<ProviderQueue, OrderFlowError> {
		self.require_role(actor, Role::ServiceProvider, "view the provider dashboard")?;
		let orders = self.orders_for(actor).await?;
		Ok(eclipse_reporting::provider_queue(&orders))
	}

	/// Customer KPI row over the customer's own orders.
	pub async fn customer_dashboard(
		&self,
		actor: &Actor,
	) -> Result<CustomerSummary, OrderFlowError> {
		self.require_role(actor, Role::Customer, "view the customer dashboard")?;
		let orders = self.orders_for(actor).await?;
		Ok(eclipse_reporting::customer_summary(&orders))
	}

	fn require_role(
		&self,
		actor: &Actor,
		role: Role,
		operation: &str,
	) -> Result<(), OrderFlowError> {
		if actor.role == role {
			Ok(())
		} else {
			Err(OrderStoreError::Unauthorized {
				operation: operation.to_string(),
				role: actor.role,
			}
			.into())
		}
	}

	async fn record(&self, action: AuditAction, detail: String, entity_id: &str, actor: &Actor) {
		let entry = AuditLogEntry::new(Utc::now(), actor.name.clone(), action, detail, entity_id);
		if let Err(err) = self.audit.record(entry).await {
			tracing::warn!(entity_id, error = %err, "audit emission failed, change kept");
		}
	}
}
