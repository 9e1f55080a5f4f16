//! Pricing module for the IronEclipse workflow core.
//!
//! This module owns the rate table and every price that enters an order.
//! Line items are priced by cloth-type tag against the current table at
//! the moment an order is created or its items are edited; the resolved
//! unit price is then stored on the line, so later rate changes never
//! reprice an existing order.

use chrono::{DateTime, Utc};
use eclipse_storage::{StorageError, StorageService};
use eclipse_types::{
	prefixed_id, Actor, ItemDraft, OrderItem, Rate, RateDraft, Role, StorageKey,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during pricing operations.
#[derive(Debug, Error)]
pub enum PricingError {
	/// Error that occurs when an order draft has no items.
	#[error("Order must contain at least one item")]
	EmptyOrder,
	/// Error that occurs when a line item has a non-positive quantity.
	#[error("Invalid quantity {qty} for cloth type '{cloth_type}'")]
	InvalidQuantity { cloth_type: String, qty: u32 },
	/// Error that occurs when a draft names a cloth type with no rate.
	#[error("No rate configured for cloth type '{0}'")]
	UnknownClothType(String),
	/// Error that occurs when a rate upsert carries a non-positive price.
	#[error("Rate price must be positive, got {0}")]
	InvalidPrice(Decimal),
	/// Error that occurs when a rate lookup misses.
	#[error("Rate not found for cloth type '{0}'")]
	RateNotFound(String),
	/// Error that occurs when the actor may not manage rates.
	#[error("Role {0} is not allowed to manage rates")]
	Unauthorized(Role),
	/// Error from the storage backend.
	#[error("Storage error: {0}")]
	Storage(String),
}

impl From<StorageError> for PricingError {
	fn from(err: StorageError) -> Self {
		PricingError::Storage(err.to_string())
	}
}

/// Service owning the rate table.
///
/// Rates are stored under their cloth-type tag, which is the unique key
/// the order form resolves prices by.
pub struct RateService {
	storage: Arc<StorageService>,
}

impl RateService {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Creates or updates the rate for a cloth type. Admin only.
	///
	/// An existing rate keeps its identifier; only price, unit, and the
	/// last-updated date move.
	pub async fn upsert_rate(
		&self,
		draft: RateDraft,
		actor: &Actor,
		now: DateTime<Utc>,
	) -> Result<Rate, PricingError> {
		if actor.role != Role::Admin {
			return Err(PricingError::Unauthorized(actor.role));
		}
		if draft.price <= Decimal::ZERO {
			return Err(PricingError::InvalidPrice(draft.price));
		}

		let existing: Option<Rate> = match self
			.storage
			.retrieve(StorageKey::Rates.as_str(), &draft.cloth_type)
			.await
		{
			Ok(rate) => Some(rate),
			Err(StorageError::NotFound) => None,
			Err(err) => return Err(err.into()),
		};

		let rate = Rate {
			id: existing
				.map(|r| r.id)
				.unwrap_or_else(|| prefixed_id("rate")),
			cloth_type: draft.cloth_type,
			price: draft.price,
			unit: draft.unit,
			last_updated: now.date_naive(),
		};

		self.storage
			.store(StorageKey::Rates.as_str(), &rate.cloth_type, &rate)
			.await?;

		tracing::info!(
			cloth_type = %rate.cloth_type,
			price = %rate.price,
			"rate upserted"
		);
		Ok(rate)
	}

	/// Looks up the rate for a cloth type.
	pub async fn find_by_cloth_type(&self, cloth_type: &str) -> Result<Rate, PricingError> {
		match self
			.storage
			.retrieve(StorageKey::Rates.as_str(), cloth_type)
			.await
		{
			Ok(rate) => Ok(rate),
			Err(StorageError::NotFound) => {
				Err(PricingError::RateNotFound(cloth_type.to_string()))
			}
			Err(err) => Err(err.into()),
		}
	}

	/// Returns the full rate table.
	pub async fn list(&self) -> Result<Vec<Rate>, PricingError> {
		Ok(self
			.storage
			.retrieve_all(StorageKey::Rates.as_str())
			.await?)
	}

	/// Validates an order draft's items and resolves their unit prices.
	///
	/// Fails without partial effect if the draft is empty, any quantity is
	/// non-positive, or any cloth type has no rate. The returned lines
	/// carry the resolved prices; callers store those, freezing them.
	pub async fn price_items(&self, drafts: &[ItemDraft]) -> Result<Vec<OrderItem>, PricingError> {
		if drafts.is_empty() {
			return Err(PricingError::EmptyOrder);
		}

		let mut items = Vec::with_capacity(drafts.len());
		for draft in drafts {
			if draft.qty == 0 {
				return Err(PricingError::InvalidQuantity {
					cloth_type: draft.cloth_type.clone(),
					qty: draft.qty,
				});
			}
			let rate = match self.find_by_cloth_type(&draft.cloth_type).await {
				Ok(rate) => rate,
				Err(PricingError::RateNotFound(tag)) => {
					return Err(PricingError::UnknownClothType(tag))
				}
				Err(err) => return Err(err),
			};
			items.push(OrderItem {
				cloth_type: draft.cloth_type.clone(),
				qty: draft.qty,
				price_per: rate.price,
			});
		}
		Ok(items)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use eclipse_storage::MemoryStorage;
	use eclipse_types::RateUnit;

	fn admin() -> Actor {
		Actor::new("usr-001", "Admin User", Role::Admin)
	}

	fn service() -> RateService {
		RateService::new(Arc::new(StorageService::new(Box::new(
			MemoryStorage::new(),
		))))
	}

	fn draft(cloth_type: &str, cents: i64) -> RateDraft {
		RateDraft {
			cloth_type: cloth_type.to_string(),
			price: Decimal::new(cents, 2),
			unit: RateUnit::PerPiece,
		}
	}

	#[tokio::test]
	async fn test_upsert_and_lookup() {
		let rates = service();
		rates
			.upsert_rate(draft("Shirt", 250), &admin(), Utc::now())
			.await
			.unwrap();

		let rate = rates.find_by_cloth_type("Shirt").await.unwrap();
		assert_eq!(rate.price, Decimal::new(250, 2));
		assert_eq!(rate.unit, RateUnit::PerPiece);
	}

	#[tokio::test]
	async fn test_upsert_keeps_id_and_replaces_price() {
		let rates = service();
		let first = rates
			.upsert_rate(draft("Shirt", 200), &admin(), Utc::now())
			.await
			.unwrap();
		let second = rates
			.upsert_rate(draft("Shirt", 250), &admin(), Utc::now())
			.await
			.unwrap();

		assert_eq!(first.id, second.id);
		assert_eq!(rates.list().await.unwrap().len(), 1);
		assert_eq!(
			rates.find_by_cloth_type("Shirt").await.unwrap().price,
			Decimal::new(250, 2)
		);
	}

	#[tokio::test]
	async fn test_upsert_rejects_non_admin_and_zero_price() {
		let rates = service();
		let provider = Actor::new("usr-003", "Service Bob", Role::ServiceProvider);

		let result = rates
			.upsert_rate(draft("Shirt", 250), &provider, Utc::now())
			.await;
		assert!(matches!(result, Err(PricingError::Unauthorized(_))));

		let result = rates.upsert_rate(draft("Shirt", 0), &admin(), Utc::now()).await;
		assert!(matches!(result, Err(PricingError::InvalidPrice(_))));
		assert!(rates.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_price_items_resolves_from_table() {
		let rates = service();
		rates
			.upsert_rate(draft("Shirt", 250), &admin(), Utc::now())
			.await
			.unwrap();
		rates
			.upsert_rate(draft("Pants", 400), &admin(), Utc::now())
			.await
			.unwrap();

		let items = rates
			.price_items(&[
				ItemDraft {
					cloth_type: "Shirt".into(),
					qty: 5,
				},
				ItemDraft {
					cloth_type: "Pants".into(),
					qty: 2,
				},
			])
			.await
			.unwrap();

		let total: Decimal = items.iter().map(OrderItem::line_total).sum();
		assert_eq!(total, Decimal::new(2050, 2));
	}

	#[tokio::test]
	async fn test_price_items_validation() {
		let rates = service();
		rates
			.upsert_rate(draft("Shirt", 250), &admin(), Utc::now())
			.await
			.unwrap();

		let result = rates.price_items(&[]).await;
		assert!(matches!(result, Err(PricingError::EmptyOrder)));

		let result = rates
			.price_items(&[ItemDraft {
				cloth_type: "Shirt".into(),
				qty: 0,
			}])
			.await;
		assert!(matches!(result, Err(PricingError::InvalidQuantity { .. })));

		let result = rates
			.price_items(&[ItemDraft {
				cloth_type: "Tuxedo".into(),
				qty: 1,
			}])
			.await;
		assert!(matches!(
			result,
			Err(PricingError::UnknownClothType(tag)) if tag == "Tuxedo"
		));
	}

	#[tokio::test]
	async fn test_priced_lines_keep_resolved_price_after_rate_change() {
		let rates = service();
		rates
			.upsert_rate(draft("Shirt", 250), &admin(), Utc::now())
			.await
			.unwrap();

		let items = rates
			.price_items(&[ItemDraft {
				cloth_type: "Shirt".into(),
				qty: 5,
			}])
			.await
			.unwrap();

		rates
			.upsert_rate(draft("Shirt", 300), &admin(), Utc::now())
			.await
			.unwrap();

		// The earlier resolution is a frozen copy, not a live view.
		assert_eq!(items[0].price_per, Decimal::new(250, 2));
	}
}
