//! Core composition crate for the IronEclipse workflow engine.
//!
//! Wires the repositories, the transition engine, the rate table, and
//! the audit log into one [`Core`] handle the presentation layer drives.
//! Everything stays in-process and synchronous from the caller's view:
//! each operation runs to completion before the next is accepted, and no
//! background task ever moves an order on its own.

use chrono::Utc;
use eclipse_pricing::{PricingError, RateService};
use eclipse_types::{Actor, AuditAction, AuditLogEntry, Rate, RateDraft};
use eclipse_workflow::{AuditError, AuditSink};
use std::sync::Arc;

pub mod audit;
pub mod builder;
pub mod config;
pub mod handlers;
pub mod state;

pub use audit::AuditLog;
pub use builder::CoreBuilder;
pub use config::{AuditConfig, ConfigError, CoreConfig, SlaConfig};
pub use handlers::{OrderFlowError, OrderHandler, PartnerHandler};
pub use state::{OrderStore, OrderStoreError, PartnerStore, PartnerStoreError};

/// The assembled workflow core.
///
/// Handlers are the operation surface; the rate table and audit log are
/// exposed for the screens that read them directly.
pub struct Core {
	/// Order placement, workflow actions, edits, and dashboards.
	pub orders: OrderHandler,
	/// Partner registration and approval.
	pub partners: PartnerHandler,
	pub(crate) rates: Arc<RateService>,
	pub(crate) audit: Arc<AuditLog>,
	pub(crate) config: CoreConfig,
}

impl Core {
	/// Starts a builder with the default in-memory setup.
	pub fn builder() -> CoreBuilder {
		CoreBuilder::new()
	}

	/// The rate table service.
	pub fn rates(&self) -> &RateService {
		&self.rates
	}

	/// The audit log.
	pub fn audit(&self) -> &AuditLog {
		&self.audit
	}

	/// Creates or updates a rate and audits the change.
	///
	/// The audit detail names the old price when one existed, matching
	/// the trail the admin screens show.
	pub async fn upsert_rate(&self, draft: RateDraft, actor: &Actor) -> Result<Rate, PricingError> {
		let now = Utc::now();
		let previous = self.rates.find_by_cloth_type(&draft.cloth_type).await.ok();
		let rate = self.rates.upsert_rate(draft, actor, now).await?;

		let detail = match previous {
			Some(old) => format!(
				"{} price changed from {} to {}",
				rate.cloth_type, old.price, rate.price
			),
			None => format!("{} rate added at {}", rate.cloth_type, rate.price),
		};
		let entry = AuditLogEntry::new(
			now,
			actor.name.clone(),
			AuditAction::RateUpdated,
			detail,
			rate.id.clone(),
		);
		if let Err(err) = self.audit.record(entry).await {
			tracing::warn!(rate_id = %rate.id, error = %err, "audit emission failed, change kept");
		}
		Ok(rate)
	}

	/// The recent-activity feed, newest first, sized by configuration.
	pub async fn recent_activity(&self) -> Result<Vec<AuditLogEntry>, AuditError> {
		self.audit.recent(self.config.audit.recent_limit).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use eclipse_types::{
		DeliveryMode, ItemDraft, OrderAction, OrderDraft, OrderStatus, PartnerDraft,
		PartnerStatus, RateUnit, Role,
	};
	use eclipse_workflow::WorkflowError;
	use rust_decimal::Decimal;

	fn init_tracing() {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	}

	fn admin() -> Actor {
		Actor::new("usr-001", "Admin User", Role::Admin)
	}

	fn alice() -> Actor {
		Actor::new("usr-002", "Customer Alice", Role::Customer)
	}

	fn bob() -> Actor {
		Actor::new("usr-003", "Service Bob", Role::ServiceProvider)
	}

	fn rate(cloth_type: &str, cents: i64) -> RateDraft {
		RateDraft {
			cloth_type: cloth_type.to_string(),
			price: Decimal::new(cents, 2),
			unit: RateUnit::PerPiece,
		}
	}

	fn shirt_order(customer: &Actor) -> OrderDraft {
		OrderDraft {
			customer_id: customer.id.clone(),
			customer_name: customer.name.clone(),
			items: vec![ItemDraft {
				cloth_type: "Shirt".into(),
				qty: 5,
			}],
			delivery: DeliveryMode::Doorstep {
				address: "123 Main St".into(),
			},
		}
	}

	async fn core_with_rates() -> Core {
		let core = Core::builder().build();
		core.upsert_rate(rate("Shirt", 250), &admin()).await.unwrap();
		core
	}

	#[tokio::test]
	async fn test_full_doorstep_lifecycle() {
		init_tracing();
		let core = core_with_rates().await;
		let (admin, alice, bob) = (admin(), alice(), bob());

		let order = core.orders.place_order(shirt_order(&alice), &alice).await.unwrap();
		assert_eq!(order.total_price, Decimal::new(1250, 2));
		assert_eq!(order.status, OrderStatus::Created);

		let order = core
			.orders
			.apply_action(&order.id, OrderAction::Accept, &bob)
			.await
			.unwrap();
		assert!(order.is_assigned_to(&bob.id));

		for action in [
			OrderAction::StartIroning,
			OrderAction::MarkReady,
			OrderAction::MarkDelivered,
		] {
			core.orders.apply_action(&order.id, action, &bob).await.unwrap();
		}

		let done = core.orders.get(&order.id).await.unwrap();
		assert_eq!(done.status, OrderStatus::Delivered);
		assert!(done.delivered_at.is_some());
		assert!(!done.sla.breached);

		// One placement entry plus four status changes.
		let trail = core.audit().for_entity(&order.id).await.unwrap();
		assert_eq!(trail.len(), 5);
		assert_eq!(trail[0].action, AuditAction::OrderPlaced);

		let summary = core.orders.admin_dashboard(&admin).await.unwrap();
		assert_eq!(summary.total_orders, 1);
		assert_eq!(summary.total_revenue, Decimal::new(1250, 2));
		assert_eq!(summary.delivery.doorstep, 1);
	}

	#[tokio::test]
	async fn test_rejected_action_leaves_stored_order_unchanged() {
		init_tracing();
		let core = core_with_rates().await;
		let alice = alice();

		let order = core.orders.place_order(shirt_order(&alice), &alice).await.unwrap();

		let result = core
			.orders
			.apply_action(&order.id, OrderAction::Accept, &alice)
			.await;
		assert!(matches!(
			result,
			Err(OrderFlowError::Workflow(WorkflowError::Unauthorized { .. }))
		));

		let stored = core.orders.get(&order.id).await.unwrap();
		assert_eq!(stored.status, OrderStatus::Created);
		assert!(stored.accepted_at.is_none());

		// Only the placement was audited.
		assert_eq!(core.audit().for_entity(&order.id).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_override_bypasses_table_and_is_flagged() {
		init_tracing();
		let core = core_with_rates().await;
		let (admin, alice) = (admin(), alice());

		let order = core.orders.place_order(shirt_order(&alice), &alice).await.unwrap();
		let forced = core
			.orders
			.override_status(&order.id, OrderStatus::Delivered, &admin)
			.await
			.unwrap();

		assert_eq!(forced.status, OrderStatus::Delivered);
		assert!(forced.delivered_at.is_none());

		let trail = core.audit().for_entity(&order.id).await.unwrap();
		assert_eq!(trail.last().unwrap().action, AuditAction::StatusOverridden);
	}

	#[tokio::test]
	async fn test_dashboards_are_role_gated() {
		init_tracing();
		let core = core_with_rates().await;

		let result = core.orders.admin_dashboard(&alice()).await;
		assert!(matches!(
			result,
			Err(OrderFlowError::Store(OrderStoreError::Unauthorized { .. }))
		));

		let summary = core.orders.customer_dashboard(&alice()).await.unwrap();
		assert_eq!(summary.orders_placed, 0);

		let queue = core.orders.provider_dashboard(&bob()).await.unwrap();
		assert_eq!(queue.accepted, 0);
	}

	#[tokio::test]
	async fn test_partner_approval_flow_and_recent_feed() {
		init_tracing();
		let core = core_with_rates().await;
		let admin = admin();

		let partner = core
			.partners
			.register(
				PartnerDraft {
					name: "Service Emily".into(),
					email: "emily@partner.com".into(),
					contact: "555-0003".into(),
					address: "303 Partner Blvd".into(),
					user_id: None,
				},
				&admin,
			)
			.await
			.unwrap();
		assert_eq!(partner.status, PartnerStatus::PendingApproval);

		let approved = core.partners.approve(&partner.id, &admin).await.unwrap();
		assert_eq!(approved.status, PartnerStatus::Active);

		// Rate upsert, registration, approval: three entries, newest first.
		let recent = core.recent_activity().await.unwrap();
		assert_eq!(recent.len(), 3);
		assert_eq!(recent[0].action, AuditAction::PartnerStatusChanged);
	}

	#[tokio::test]
	async fn test_rate_change_does_not_reprice_stored_orders() {
		init_tracing();
		let core = core_with_rates().await;
		let (admin, alice) = (admin(), alice());

		let order = core.orders.place_order(shirt_order(&alice), &alice).await.unwrap();
		core.upsert_rate(rate("Shirt", 300), &admin).await.unwrap();

		let stored = core.orders.get(&order.id).await.unwrap();
		assert_eq!(stored.total_price, Decimal::new(1250, 2));

		// Editing the items re-prices from the current table.
		let edited = core
			.orders
			.edit_items(
				&order.id,
				&[ItemDraft {
					cloth_type: "Shirt".into(),
					qty: 5,
				}],
				&admin,
			)
			.await
			.unwrap();
		assert_eq!(edited.total_price, Decimal::new(1500, 2));
	}
}
