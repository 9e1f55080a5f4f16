//! Order types for the workflow core.
//!
//! This module defines the order record, its line items, delivery modes,
//! lifecycle statuses, and the derived SLA record carried on every order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an order in its lifecycle.
///
/// `Delivered`, `Picked`, and `Cancelled` are terminal: the transition
/// engine rejects any action against them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
	/// Order has been placed but not yet accepted by a provider.
	Created,
	/// A service provider has taken the order.
	Accepted,
	/// The provider is working the order.
	Ironing,
	/// Finished and waiting for handover.
	Ready,
	/// Handed over at the customer's doorstep.
	Delivered,
	/// Collected by the customer at the pickup location.
	Picked,
	/// Cancelled by an administrator.
	Cancelled,
}

impl OrderStatus {
	/// Every status, in lifecycle order, for per-status breakdowns.
	pub const ALL: [OrderStatus; 7] = [
		OrderStatus::Created,
		OrderStatus::Accepted,
		OrderStatus::Ironing,
		OrderStatus::Ready,
		OrderStatus::Delivered,
		OrderStatus::Picked,
		OrderStatus::Cancelled,
	];

	/// Whether this status has no outgoing transitions.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OrderStatus::Delivered | OrderStatus::Picked | OrderStatus::Cancelled
		)
	}

	/// Whether the order reached the customer (revenue counts these).
	pub fn is_completed(&self) -> bool {
		matches!(self, OrderStatus::Delivered | OrderStatus::Picked)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Created => write!(f, "Created"),
			OrderStatus::Accepted => write!(f, "Accepted"),
			OrderStatus::Ironing => write!(f, "Ironing"),
			OrderStatus::Ready => write!(f, "Ready"),
			OrderStatus::Delivered => write!(f, "Delivered"),
			OrderStatus::Picked => write!(f, "Picked"),
			OrderStatus::Cancelled => write!(f, "Cancelled"),
		}
	}
}

/// Actions an actor can attempt against an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OrderAction {
	/// Provider takes ownership of a freshly created order.
	Accept,
	/// Assigned provider begins working the order.
	StartIroning,
	/// Assigned provider finishes and stages the order for handover.
	MarkReady,
	/// Doorstep handover complete.
	MarkDelivered,
	/// Customer-pickup handover complete.
	MarkPicked,
	/// Administrator cancels a non-terminal order.
	Cancel,
}

impl fmt::Display for OrderAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderAction::Accept => write!(f, "accept"),
			OrderAction::StartIroning => write!(f, "startIroning"),
			OrderAction::MarkReady => write!(f, "markReady"),
			OrderAction::MarkDelivered => write!(f, "markDelivered"),
			OrderAction::MarkPicked => write!(f, "markPicked"),
			OrderAction::Cancel => write!(f, "cancel"),
		}
	}
}

/// How the finished order reaches the customer.
///
/// The mode-dependent required field lives inside the variant, so the two
/// fields are mutually exclusive by construction and switching mode drops
/// the inactive one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DeliveryMode {
	/// Delivered to the customer's address.
	Doorstep { address: String },
	/// Collected by the customer at a partner location.
	CustomerPickup { location: String },
}

impl DeliveryMode {
	pub fn is_doorstep(&self) -> bool {
		matches!(self, DeliveryMode::Doorstep { .. })
	}
}

impl fmt::Display for DeliveryMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeliveryMode::Doorstep { .. } => write!(f, "Doorstep"),
			DeliveryMode::CustomerPickup { .. } => write!(f, "Customer Pickup"),
		}
	}
}

/// One priced line of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
	/// Cloth-type tag, the key into the rate table.
	pub cloth_type: String,
	/// Number of pieces; always positive.
	pub qty: u32,
	/// Unit price resolved from the rate table when the line was written.
	pub price_per: Decimal,
}

impl OrderItem {
	/// Quantity times unit price for this line.
	pub fn line_total(&self) -> Decimal {
		Decimal::from(self.qty) * self.price_per
	}
}

/// Unpriced line item as submitted by the caller.
///
/// Unit prices are never accepted from the outside; they are resolved
/// against the rate table when the draft is priced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
	pub cloth_type: String,
	pub qty: u32,
}

/// Input to order creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
	/// Customer placing the order.
	pub customer_id: String,
	/// Denormalized customer display name.
	pub customer_name: String,
	/// Requested items, priced during creation.
	pub items: Vec<ItemDraft>,
	/// Requested handover mode with its required field.
	pub delivery: DeliveryMode,
}

/// Denormalized reference to the provider assigned to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRef {
	pub id: String,
	pub name: String,
}

/// Derived SLA view of an order.
///
/// Never stored as an independent source of truth: the evaluator
/// recomputes `breached` on every read, and `due` is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlaRecord {
	/// Mirrors the order status at evaluation time.
	pub current_stage: OrderStatus,
	/// Deadline derived from the creation time.
	pub due: Option<DateTime<Utc>>,
	/// Whether the deadline passed while the order was still active.
	pub breached: bool,
}

/// An order moving through the ironing workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Customer who placed the order.
	pub customer_id: String,
	/// Denormalized customer display name.
	pub customer_name: String,
	/// Priced line items.
	pub items: Vec<OrderItem>,
	/// Derived: always the sum of line totals, recomputed on every item
	/// mutation.
	pub total_price: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Handover mode and its required field.
	pub delivery: DeliveryMode,
	/// Provider assigned on accept; None until then.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub service_provider: Option<ProviderRef>,
	/// Timestamp when the order was placed.
	pub created_at: DateTime<Utc>,
	/// Stage timestamps, each set exactly once by its transition.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub accepted_at: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ironing_started_at: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ready_at: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub delivered_at: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub picked_at: Option<DateTime<Utc>>,
	/// SLA view as of the last evaluation.
	pub sla: SlaRecord,
}

impl Order {
	/// Sum of line totals over the current items.
	pub fn computed_total(&self) -> Decimal {
		self.items.iter().map(OrderItem::line_total).sum()
	}

	/// Restores the derived-total invariant after an item mutation.
	pub fn recompute_total(&mut self) {
		self.total_price = self.computed_total();
	}

	/// Timestamp recorded for the given stage, if the order passed it.
	pub fn stage_timestamp(&self, stage: OrderStatus) -> Option<DateTime<Utc>> {
		match stage {
			OrderStatus::Created => Some(self.created_at),
			OrderStatus::Accepted => self.accepted_at,
			OrderStatus::Ironing => self.ironing_started_at,
			OrderStatus::Ready => self.ready_at,
			OrderStatus::Delivered => self.delivered_at,
			OrderStatus::Picked => self.picked_at,
			OrderStatus::Cancelled => None,
		}
	}

	/// Whether the given provider is the one assigned to this order.
	pub fn is_assigned_to(&self, provider_id: &str) -> bool {
		self.service_provider
			.as_ref()
			.is_some_and(|p| p.id == provider_id)
	}
}
