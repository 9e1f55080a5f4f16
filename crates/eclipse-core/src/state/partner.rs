//! Partner repository.
//!
//! Owns the service-partner collection. Registration and every status
//! move are Admin operations; providers never edit their own profile
//! through this core.

use eclipse_storage::{StorageError, StorageService};
use eclipse_types::{prefixed_id, Actor, Partner, PartnerDraft, PartnerStatus, Role, StorageKey};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during partner repository operations.
#[derive(Debug, Error)]
pub enum PartnerStoreError {
	/// Error that occurs when no partner has the given identifier.
	#[error("Partner not found: {0}")]
	NotFound(String),
	/// Error that occurs when the actor may not perform the operation.
	#[error("Role {role} is not allowed to {operation}")]
	Unauthorized { operation: String, role: Role },
	/// Error that occurs when a draft is malformed.
	#[error("Validation failed: {0}")]
	Validation(String),
	/// Error from the storage backend.
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Repository for the partner collection.
pub struct PartnerStore {
	storage: Arc<StorageService>,
}

impl PartnerStore {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Registers a partner profile. Admin only; always starts pending.
	pub async fn register(
		&self,
		draft: PartnerDraft,
		actor: &Actor,
	) -> Result<Partner, PartnerStoreError> {
		Self::require_admin(actor, "register partners")?;
		Self::validate_draft(&draft)?;

		let partner = Partner {
			id: prefixed_id("ptr"),
			name: draft.name,
			email: draft.email,
			contact: draft.contact,
			address: draft.address,
			status: PartnerStatus::PendingApproval,
			user_id: draft.user_id,
		};
		self.storage
			.store(StorageKey::Partners.as_str(), &partner.id, &partner)
			.await
			.map_err(|e| PartnerStoreError::Storage(e.to_string()))?;
		Ok(partner)
	}

	/// Fetches a partner by identifier.
	pub async fn get(&self, id: &str) -> Result<Partner, PartnerStoreError> {
		match self
			.storage
			.retrieve(StorageKey::Partners.as_str(), id)
			.await
		{
			Ok(partner) => Ok(partner),
			Err(StorageError::NotFound) => Err(PartnerStoreError::NotFound(id.to_string())),
			Err(err) => Err(PartnerStoreError::Storage(err.to_string())),
		}
	}

	/// Snapshot of all partners. Admin only.
	pub async fn list(&self, actor: &Actor) -> Result<Vec<Partner>, PartnerStoreError> {
		Self::require_admin(actor, "list partners")?;
		self.storage
			.retrieve_all(StorageKey::Partners.as_str())
			.await
			.map_err(|e| PartnerStoreError::Storage(e.to_string()))
	}

	/// Moves a partner's approval status. Admin only.
	pub async fn set_status(
		&self,
		id: &str,
		status: PartnerStatus,
		actor: &Actor,
	) -> Result<Partner, PartnerStoreError> {
		Self::require_admin(actor, "change partner status")?;

		let mut partner = self.get(id).await?;
		partner.status = status;
		self.storage
			.update(StorageKey::Partners.as_str(), id, &partner)
			.await
			.map_err(|e| PartnerStoreError::Storage(e.to_string()))?;
		Ok(partner)
	}

	/// Replaces a partner profile. Admin only.
	pub async fn update(
		&self,
		partner: Partner,
		actor: &Actor,
	) -> Result<Partner, PartnerStoreError> {
		Self::require_admin(actor, "edit partners")?;
		match self
			.storage
			.update(StorageKey::Partners.as_str(), &partner.id, &partner)
			.await
		{
			Ok(()) => Ok(partner),
			Err(StorageError::NotFound) => Err(PartnerStoreError::NotFound(partner.id)),
			Err(err) => Err(PartnerStoreError::Storage(err.to_string())),
		}
	}

	fn require_admin(actor: &Actor, operation: &str) -> Result<(), PartnerStoreError> {
		if actor.role == Role::Admin {
			Ok(())
		} else {
			Err(PartnerStoreError::Unauthorized {
				operation: operation.to_string(),
				role: actor.role,
			})
		}
	}

	fn validate_draft(draft: &PartnerDraft) -> Result<(), PartnerStoreError> {
		if draft.name.trim().is_empty() {
			return Err(PartnerStoreError::Validation(
				"Partner name is required".to_string(),
			));
		}
		if !draft.email.contains('@') {
			return Err(PartnerStoreError::Validation(format!(
				"Invalid partner email '{}'",
				draft.email
			)));
		}
		if draft.contact.trim().is_empty() || draft.address.trim().is_empty() {
			return Err(PartnerStoreError::Validation(
				"Partner contact and address are required".to_string(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use eclipse_storage::MemoryStorage;

	fn admin() -> Actor {
		Actor::new("usr-001", "Admin User", Role::Admin)
	}

	fn store() -> PartnerStore {
		PartnerStore::new(Arc::new(StorageService::new(Box::new(
			MemoryStorage::new(),
		))))
	}

	fn draft() -> PartnerDraft {
		PartnerDraft {
			name: "Service Emily".into(),
			email: "emily@partner.com".into(),
			contact: "555-0003".into(),
			address: "303 Partner Blvd".into(),
			user_id: None,
		}
	}

	#[tokio::test]
	async fn test_register_starts_pending() {
		let store = store();
		let partner = store.register(draft(), &admin()).await.unwrap();
		assert_eq!(partner.status, PartnerStatus::PendingApproval);
		assert!(partner.id.starts_with("ptr-"));
		assert_eq!(store.get(&partner.id).await.unwrap(), partner);
	}

	#[tokio::test]
	async fn test_register_validates_draft() {
		let store = store();
		let mut bad = draft();
		bad.email = "not-an-email".into();
		let result = store.register(bad, &admin()).await;
		assert!(matches!(result, Err(PartnerStoreError::Validation(_))));
	}

	#[tokio::test]
	async fn test_status_moves_are_admin_only() {
		let store = store();
		let partner = store.register(draft(), &admin()).await.unwrap();
		let provider = Actor::new("usr-003", "Service Bob", Role::ServiceProvider);

		let result = store
			.set_status(&partner.id, PartnerStatus::Active, &provider)
			.await;
		assert!(matches!(result, Err(PartnerStoreError::Unauthorized { .. })));
		assert_eq!(
			store.get(&partner.id).await.unwrap().status,
			PartnerStatus::PendingApproval
		);

		let approved = store
			.set_status(&partner.id, PartnerStatus::Active, &admin())
			.await
			.unwrap();
		assert_eq!(approved.status, PartnerStatus::Active);

		let deactivated = store
			.set_status(&partner.id, PartnerStatus::Deactivated, &admin())
			.await
			.unwrap();
		assert_eq!(deactivated.status, PartnerStatus::Deactivated);
	}

	#[tokio::test]
	async fn test_list_is_admin_only() {
		let store = store();
		store.register(draft(), &admin()).await.unwrap();

		let customer = Actor::new("usr-002", "Customer Alice", Role::Customer);
		let result = store.list(&customer).await;
		assert!(matches!(result, Err(PartnerStoreError::Unauthorized { .. })));

		assert_eq!(store.list(&admin()).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_set_status_on_missing_partner() {
		let store = store();
		let result = store
			.set_status("ptr-deadbeef", PartnerStatus::Active, &admin())
			.await;
		assert!(matches!(result, Err(PartnerStoreError::NotFound(_))));
	}
}
