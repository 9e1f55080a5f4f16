//! Order transition engine.
//!
//! Implements the transition table over (current status, action, delivery
//! mode) with per-row actor requirements. The functions here are pure:
//! they read the order, and on success return an updated clone, so a
//! rejected attempt can never leave partial side effects behind.
//!
//! | From     | Action        | To        | Required actor                        |
//! |----------|---------------|-----------|---------------------------------------|
//! | Created  | accept        | Accepted  | any service provider                  |
//! | Accepted | startIroning  | Ironing   | assigned provider                     |
//! | Ironing  | markReady     | Ready     | assigned provider                     |
//! | Ready    | markDelivered | Delivered | assigned provider, doorstep orders    |
//! | Ready    | markPicked    | Picked    | assigned provider, pickup orders      |
//! | non-terminal | cancel    | Cancelled | admin                                 |

use crate::{sla, WorkflowError};
use chrono::{DateTime, Utc};
use eclipse_types::{
	Actor, AuditAction, Order, OrderAction, OrderStatus, ProviderRef, Role,
};

/// Result of a successfully applied action.
///
/// Carries the updated order together with the audit tag and detail the
/// service layer records for it.
#[derive(Debug, Clone)]
pub struct Transition {
	/// The order after the transition.
	pub order: Order,
	/// Audit tag classifying the change.
	pub action: AuditAction,
	/// Human-readable description recorded to the audit log.
	pub detail: String,
}

/// Rows of the transition table, resolved before any actor check.
enum Row {
	Accept,
	StartIroning,
	MarkReady,
	MarkDelivered,
	MarkPicked,
	Cancel,
}

/// Validates and applies a transition-table action.
///
/// Row resolution happens first: an action with no row for the current
/// status (or the wrong delivery mode) is an invalid transition no matter
/// who asks. Only when the row exists is the actor judged against its
/// role and identity requirement.
pub fn apply_action(
	order: &Order,
	action: OrderAction,
	actor: &Actor,
	now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
	let row = match (order.status, action) {
		(OrderStatus::Created, OrderAction::Accept) => Row::Accept,
		(OrderStatus::Accepted, OrderAction::StartIroning) => Row::StartIroning,
		(OrderStatus::Ironing, OrderAction::MarkReady) => Row::MarkReady,
		(OrderStatus::Ready, OrderAction::MarkDelivered) if order.delivery.is_doorstep() => {
			Row::MarkDelivered
		}
		(OrderStatus::Ready, OrderAction::MarkPicked) if !order.delivery.is_doorstep() => {
			Row::MarkPicked
		}
		(status, OrderAction::Cancel) if !status.is_terminal() => Row::Cancel,
		_ => {
			return Err(WorkflowError::InvalidTransition {
				status: order.status,
				action,
				role: actor.role,
			})
		}
	};

	let authorized = match row {
		Row::Accept => actor.role == Role::ServiceProvider,
		Row::StartIroning | Row::MarkReady | Row::MarkDelivered | Row::MarkPicked => {
			actor.role == Role::ServiceProvider && order.is_assigned_to(&actor.id)
		}
		Row::Cancel => actor.role == Role::Admin,
	};
	if !authorized {
		return Err(WorkflowError::Unauthorized {
			operation: action.to_string(),
			role: actor.role,
		});
	}

	let from = order.status;
	let mut updated = order.clone();
	match row {
		Row::Accept => {
			updated.status = OrderStatus::Accepted;
			updated.accepted_at = Some(now);
			updated.service_provider = Some(ProviderRef {
				id: actor.id.clone(),
				name: actor.name.clone(),
			});
		}
		Row::StartIroning => {
			updated.status = OrderStatus::Ironing;
			updated.ironing_started_at = Some(now);
		}
		Row::MarkReady => {
			updated.status = OrderStatus::Ready;
			updated.ready_at = Some(now);
		}
		Row::MarkDelivered => {
			updated.status = OrderStatus::Delivered;
			updated.delivered_at = Some(now);
		}
		Row::MarkPicked => {
			updated.status = OrderStatus::Picked;
			updated.picked_at = Some(now);
		}
		Row::Cancel => {
			// Cancellation records no stage timestamp.
			updated.status = OrderStatus::Cancelled;
		}
	}
	updated.sla = sla::evaluate_at(&updated, now);

	let detail = format!(
		"Order {} changed from {} to {}",
		updated.id, from, updated.status
	);
	Ok(Transition {
		order: updated,
		action: AuditAction::OrderStatusChanged,
		detail,
	})
}

/// Sets an order's status directly, bypassing the transition table.
///
/// This is the administrative edit path of the order form, kept as a
/// distinct operation: it stamps no stage timestamps and accepts any
/// target status, terminal or not. Admin only.
pub fn admin_override(
	order: &Order,
	new_status: OrderStatus,
	actor: &Actor,
	now: DateTime<Utc>,
) -> Result<Transition, WorkflowError> {
	if actor.role != Role::Admin {
		return Err(WorkflowError::Unauthorized {
			operation: "statusOverride".to_string(),
			role: actor.role,
		});
	}

	let from = order.status;
	let mut updated = order.clone();
	updated.status = new_status;
	updated.sla = sla::evaluate_at(&updated, now);

	let detail = format!(
		"Order {} status forced from {} to {}",
		updated.id, from, new_status
	);
	Ok(Transition {
		order: updated,
		action: AuditAction::StatusOverridden,
		detail,
	})
}

#[cfg(test)]
pub(crate) mod tests_support {
	use super::*;
	use chrono::{Duration, TimeZone};
	use eclipse_types::{DeliveryMode, OrderItem, SlaRecord};
	use rust_decimal::Decimal;

	pub fn base_time() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2023, 10, 24, 10, 0, 0).unwrap()
	}

	pub fn admin() -> Actor {
		Actor::new("usr-001", "Admin User", Role::Admin)
	}

	pub fn customer() -> Actor {
		Actor::new("usr-002", "Customer Alice", Role::Customer)
	}

	pub fn provider(id: &str) -> Actor {
		Actor::new(id, "Service Bob", Role::ServiceProvider)
	}

	pub fn order_with_status(status: OrderStatus, assigned: bool) -> Order {
		build(
			status,
			assigned,
			DeliveryMode::Doorstep {
				address: "123 Main St".into(),
			},
		)
	}

	pub fn pickup_order(status: OrderStatus) -> Order {
		build(
			status,
			true,
			DeliveryMode::CustomerPickup {
				location: "Partner A Store".into(),
			},
		)
	}

	fn build(status: OrderStatus, assigned: bool, delivery: DeliveryMode) -> Order {
		let t0 = base_time();
		let at = |h: i64| Some(t0 + Duration::hours(h));

		let mut order = Order {
			id: "ord-11111111".into(),
			customer_id: "usr-002".into(),
			customer_name: "Customer Alice".into(),
			items: vec![OrderItem {
				cloth_type: "Shirt".into(),
				qty: 5,
				price_per: Decimal::new(250, 2),
			}],
			total_price: Decimal::new(1250, 2),
			status,
			delivery,
			service_provider: assigned.then(|| ProviderRef {
				id: "P1".into(),
				name: "Service Bob".into(),
			}),
			created_at: t0,
			accepted_at: None,
			ironing_started_at: None,
			ready_at: None,
			delivered_at: None,
			picked_at: None,
			sla: SlaRecord {
				current_stage: status,
				due: Some(t0 + Duration::hours(24)),
				breached: false,
			},
		};

		// Stamp the stages the order has already passed through.
		match status {
			OrderStatus::Created | OrderStatus::Cancelled => {}
			OrderStatus::Accepted => {
				order.accepted_at = at(1);
			}
			OrderStatus::Ironing => {
				order.accepted_at = at(1);
				order.ironing_started_at = at(2);
			}
			OrderStatus::Ready => {
				order.accepted_at = at(1);
				order.ironing_started_at = at(2);
				order.ready_at = at(3);
			}
			OrderStatus::Delivered => {
				order.accepted_at = at(1);
				order.ironing_started_at = at(2);
				order.ready_at = at(3);
				order.delivered_at = at(4);
			}
			OrderStatus::Picked => {
				order.accepted_at = at(1);
				order.ironing_started_at = at(2);
				order.ready_at = at(3);
				order.picked_at = at(4);
			}
		}
		order
	}
}
