//! Reporting module for the IronEclipse workflow core.
//!
//! Stateless aggregation functions over a snapshot of the order
//! collection. Nothing here caches: every figure is re-derived from the
//! slice it is handed, and every reduction is commutative, so input
//! ordering never changes a result. Role scoping happens before these
//! functions run; callers pass the slice the acting role is allowed to
//! see.

use chrono::{DateTime, Utc};
use eclipse_types::{Order, OrderStatus};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Counts of orders by handover mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryBreakdown {
	pub doorstep: usize,
	pub pickup: usize,
}

/// KPI row of the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSummary {
	pub total_orders: usize,
	pub total_revenue: Decimal,
	pub average_turnaround_hours: f64,
	pub delivery: DeliveryBreakdown,
	pub sla_breaches: usize,
}

/// KPI row of the provider dashboard, over the provider's own orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderQueue {
	/// Orders accepted and waiting to be worked.
	pub accepted: usize,
	/// Orders currently being ironed.
	pub in_progress: usize,
	/// Orders that reached the customer.
	pub completed: usize,
	/// Doorstep orders that will need a delivery run.
	pub deliveries_scheduled: usize,
}

/// KPI row of the customer dashboard, over the customer's own orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomerSummary {
	pub orders_placed: usize,
	pub orders_ready: usize,
}

/// Number of orders in the snapshot.
pub fn total_orders(orders: &[Order]) -> usize {
	orders.len()
}

/// Revenue over orders that reached the customer.
pub fn total_revenue(orders: &[Order]) -> Decimal {
	orders
		.iter()
		.filter(|o| o.status.is_completed())
		.map(|o| o.total_price)
		.sum()
}

/// Mean hours from creation to handover over completed orders.
///
/// The handover anchor is the delivered timestamp, falling back to the
/// ready timestamp for picked-up orders. Returns 0.0 when no completed
/// order carries an anchor, so an empty dashboard renders a zero rather
/// than an error.
pub fn average_turnaround_hours(orders: &[Order]) -> f64 {
	let turnarounds: Vec<f64> = orders
		.iter()
		.filter(|o| o.status.is_completed())
		.filter_map(|o| {
			let anchor = o.delivered_at.or(o.ready_at)?;
			Some((anchor - o.created_at).num_seconds() as f64 / 3600.0)
		})
		.collect();

	if turnarounds.is_empty() {
		return 0.0;
	}
	turnarounds.iter().sum::<f64>() / turnarounds.len() as f64
}

/// Orders split by handover mode.
pub fn delivery_vs_pickup(orders: &[Order]) -> DeliveryBreakdown {
	orders.iter().fold(DeliveryBreakdown::default(), |mut acc, o| {
		if o.delivery.is_doorstep() {
			acc.doorstep += 1;
		} else {
			acc.pickup += 1;
		}
		acc
	})
}

/// Order counts per status, including zero rows for unused statuses.
pub fn status_counts(orders: &[Order]) -> HashMap<OrderStatus, usize> {
	let mut counts: HashMap<OrderStatus, usize> =
		OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect();
	for order in orders {
		*counts.entry(order.status).or_default() += 1;
	}
	counts
}

/// Number of active orders past their due as of `now`.
pub fn sla_breach_count(orders: &[Order], now: DateTime<Utc>) -> usize {
	orders
		.iter()
		.filter(|o| eclipse_workflow::sla::evaluate_at(o, now).breached)
		.count()
}

/// The admin dashboard's KPI row in one pass over the snapshot.
pub fn admin_summary(orders: &[Order], now: DateTime<Utc>) -> AdminSummary {
	AdminSummary {
		total_orders: total_orders(orders),
		total_revenue: total_revenue(orders),
		average_turnaround_hours: average_turnaround_hours(orders),
		delivery: delivery_vs_pickup(orders),
		sla_breaches: sla_breach_count(orders, now),
	}
}

/// The provider dashboard's KPI row over a provider-scoped snapshot.
pub fn provider_queue(orders: &[Order]) -> ProviderQueue {
	orders.iter().fold(ProviderQueue::default(), |mut acc, o| {
		match o.status {
			OrderStatus::Accepted => acc.accepted += 1,
			OrderStatus::Ironing => acc.in_progress += 1,
			OrderStatus::Delivered | OrderStatus::Picked => acc.completed += 1,
			_ => {}
		}
		if o.delivery.is_doorstep()
			&& matches!(o.status, OrderStatus::Ironing | OrderStatus::Ready)
		{
			acc.deliveries_scheduled += 1;
		}
		acc
	})
}

/// The customer dashboard's KPI row over a customer-scoped snapshot.
pub fn customer_summary(orders: &[Order]) -> CustomerSummary {
	CustomerSummary {
		orders_placed: orders.len(),
		orders_ready: orders
			.iter()
			.filter(|o| {
				matches!(
					o.status,
					OrderStatus::Ready | OrderStatus::Delivered | OrderStatus::Picked
				)
			})
			.count(),
	}
}

/// Oldest active orders first, for the customer's upcoming-orders panel.
pub fn upcoming(orders: &[Order], limit: usize) -> Vec<&Order> {
	let mut active: Vec<&Order> = orders.iter().filter(|o| !o.status.is_terminal()).collect();
	active.sort_by_key(|o| o.created_at);
	active.truncate(limit);
	active
}

/// Oldest workable orders first, for the provider's task queue panel.
pub fn task_queue(orders: &[Order], limit: usize) -> Vec<&Order> {
	let mut queue: Vec<&Order> = orders
		.iter()
		.filter(|o| {
			matches!(
				o.status,
				OrderStatus::Accepted | OrderStatus::Ironing | OrderStatus::Ready
			)
		})
		.collect();
	queue.sort_by_key(|o| o.created_at);
	queue.truncate(limit);
	queue
}
