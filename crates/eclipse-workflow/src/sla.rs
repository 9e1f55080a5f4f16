//! SLA evaluation.
//!
//! An order gets one due timestamp at creation (creation time plus the
//! configured window) and the deadline is judged against it on every
//! read. The due is not recomputed on transitions; per-stage windows
//! would hang off [`evaluate_at`] if they are ever wanted.

use chrono::{DateTime, Duration, Utc};
use eclipse_types::{Order, OrderStatus, SlaRecord};

/// Builds the SLA record stamped onto a freshly created order.
pub fn initial(created_at: DateTime<Utc>, window: Duration) -> SlaRecord {
	SlaRecord {
		current_stage: OrderStatus::Created,
		due: Some(created_at + window),
		breached: false,
	}
}

/// Evaluates an order's SLA as of `now`.
///
/// Breached means the due timestamp exists, has passed, and the order is
/// still active; terminal orders are never breached regardless of their
/// due. Pure: safe to call on every render or poll.
pub fn evaluate_at(order: &Order, now: DateTime<Utc>) -> SlaRecord {
	let breached = match order.sla.due {
		Some(due) => now > due && !order.status.is_terminal(),
		None => false,
	};
	SlaRecord {
		current_stage: order.status,
		due: order.sla.due,
		breached,
	}
}
