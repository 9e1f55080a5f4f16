//! Order repository.
//!
//! Owns the canonical order collection. All order state reaches storage
//! through this store, which re-derives the total price on every write
//! so the stored figure can never drift from the line items. Role checks
//! run here, not only in the calling layer.

use chrono::{DateTime, Duration, Utc};
use eclipse_pricing::{PricingError, RateService};
use eclipse_storage::{StorageError, StorageService};
use eclipse_types::{
	prefixed_id, Actor, DeliveryMode, ItemDraft, Order, OrderDraft, OrderStatus, Role, StorageKey,
};
use eclipse_workflow::sla;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order repository operations.
#[derive(Debug, Error)]
pub enum OrderStoreError {
	/// Error that occurs when no order has the given identifier.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// Error that occurs when the actor may not perform the operation.
	#[error("Role {role} is not allowed to {operation}")]
	Unauthorized { operation: String, role: Role },
	/// Error that occurs when a draft or edit is malformed.
	#[error("Validation failed: {0}")]
	Validation(String),
	/// Error from the storage backend.
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<PricingError> for OrderStoreError {
	fn from(err: PricingError) -> Self {
		match err {
			PricingError::Storage(msg) => OrderStoreError::Storage(msg),
			other => OrderStoreError::Validation(other.to_string()),
		}
	}
}

/// Repository for the order collection.
pub struct OrderStore {
	storage: Arc<StorageService>,
	rates: Arc<RateService>,
	sla_window: Duration,
}

impl OrderStore {
	pub fn new(storage: Arc<StorageService>, rates: Arc<RateService>, sla_window: Duration) -> Self {
		Self {
			storage,
			rates,
			sla_window,
		}
	}

	/// Creates an order from a draft.
	///
	/// Customers create orders for themselves; admins for anyone. Items
	/// are validated and priced against the current rate table, the total
	/// is derived from the priced lines, and the SLA due is set to the
	/// creation time plus the configured window. Nothing is stored when
	/// validation fails.
	pub async fn create(
		&self,
		draft: OrderDraft,
		actor: &Actor,
		now: DateTime<Utc>,
	) -> Result<Order, OrderStoreError> {
		match actor.role {
			Role::Admin => {}
			Role::Customer if draft.customer_id == actor.id => {}
			role => {
				return Err(OrderStoreError::Unauthorized {
					operation: "create this order".to_string(),
					role,
				})
			}
		}
		Self::validate_delivery(&draft.delivery)?;
		let items = self.rates.price_items(&draft.items).await?;

		let mut order = Order {
			id: prefixed_id("ord"),
			customer_id: draft.customer_id,
			customer_name: draft.customer_name,
			items,
			total_price: Default::default(),
			status: OrderStatus::Created,
			delivery: draft.delivery,
			service_provider: None,
			created_at: now,
			accepted_at: None,
			ironing_started_at: None,
			ready_at: None,
			delivered_at: None,
			picked_at: None,
			sla: sla::initial(now, self.sla_window),
		};
		order.recompute_total();

		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, &order)
			.await
			.map_err(|e| OrderStoreError::Storage(e.to_string()))?;
		Ok(order)
	}

	/// Fetches an order by identifier.
	pub async fn get(&self, id: &str) -> Result<Order, OrderStoreError> {
		match self.storage.retrieve(StorageKey::Orders.as_str(), id).await {
			Ok(order) => Ok(order),
			Err(StorageError::NotFound) => Err(OrderStoreError::NotFound(id.to_string())),
			Err(err) => Err(OrderStoreError::Storage(err.to_string())),
		}
	}

	/// Replaces the stored order with the same identifier.
	///
	/// The total is re-derived from the items before the write, so a
	/// caller handing in a drifted figure cannot break the invariant.
	/// Callers are expected to have authorized the mutation; the public
	/// edit paths below are the gated entry points.
	pub async fn update(&self, mut order: Order) -> Result<Order, OrderStoreError> {
		order.recompute_total();
		match self
			.storage
			.update(StorageKey::Orders.as_str(), &order.id, &order)
			.await
		{
			Ok(()) => Ok(order),
			Err(StorageError::NotFound) => Err(OrderStoreError::NotFound(order.id.clone())),
			Err(err) => Err(OrderStoreError::Storage(err.to_string())),
		}
	}

	/// Snapshot of the orders the actor is allowed to see.
	///
	/// Admins see everything, customers their own orders, and providers
	/// the orders assigned to them plus the unassigned `Created` queue
	/// they could accept.
	pub async fn list_scoped(&self, actor: &Actor) -> Result<Vec<Order>, OrderStoreError> {
		let orders: Vec<Order> = self
			.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(|e| OrderStoreError::Storage(e.to_string()))?;

		Ok(match actor.role {
			Role::Admin => orders,
			Role::Customer => orders
				.into_iter()
				.filter(|o| o.customer_id == actor.id)
				.collect(),
			Role::ServiceProvider => orders
				.into_iter()
				.filter(|o| o.is_assigned_to(&actor.id) || o.status == OrderStatus::Created)
				.collect(),
		})
	}

	/// Replaces an order's items, re-pricing them from the rate table.
	///
	/// Admin or the assigned provider only. Status and stage timestamps
	/// are never touched by an item edit.
	pub async fn edit_items(
		&self,
		id: &str,
		drafts: &[ItemDraft],
		actor: &Actor,
	) -> Result<Order, OrderStoreError> {
		let order = self.get(id).await?;
		Self::authorize_edit(&order, actor)?;
		let items = self.rates.price_items(drafts).await?;

		let mut updated = order;
		updated.items = items;
		self.update(updated).await
	}

	/// Switches an order's handover mode.
	///
	/// Admin or the assigned provider only. The variant swap drops the
	/// previous mode's field; the incoming one must be filled in.
	pub async fn edit_delivery(
		&self,
		id: &str,
		delivery: DeliveryMode,
		actor: &Actor,
	) -> Result<Order, OrderStoreError> {
		let order = self.get(id).await?;
		Self::authorize_edit(&order, actor)?;
		Self::validate_delivery(&delivery)?;

		let mut updated = order;
		updated.delivery = delivery;
		self.update(updated).await
	}

	fn authorize_edit(order: &Order, actor: &Actor) -> Result<(), OrderStoreError> {
		let allowed = match actor.role {
			Role::Admin => true,
			Role::ServiceProvider => order.is_assigned_to(&actor.id),
			Role::Customer => false,
		};
		if allowed {
			Ok(())
		} else {
			Err(OrderStoreError::Unauthorized {
				operation: "edit this order".to_string(),
				role: actor.role,
			})
		}
	}

	fn validate_delivery(delivery: &DeliveryMode) -> Result<(), OrderStoreError> {
		match delivery {
			DeliveryMode::Doorstep { address } if address.trim().is_empty() => {
				Err(OrderStoreError::Validation(
					"Delivery address is required for doorstep delivery".to_string(),
				))
			}
			DeliveryMode::CustomerPickup { location } if location.trim().is_empty() => {
				Err(OrderStoreError::Validation(
					"Pickup location is required for customer pickup".to_string(),
				))
			}
			_ => Ok(()),
		}
	}
}
