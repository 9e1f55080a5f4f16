//! Partner handler.
//!
//! Admin-facing operations over the partner collection, each leaving an
//! audit entry.

use crate::audit::AuditLog;
use crate::state::{PartnerStore, PartnerStoreError};
use chrono::Utc;
use eclipse_types::{Actor, AuditAction, AuditLogEntry, Partner, PartnerDraft, PartnerStatus};
use eclipse_workflow::AuditSink;
use std::sync::Arc;
use tracing::instrument;

/// Handler for partner registration and approval.
pub struct PartnerHandler {
	store: Arc<PartnerStore>,
	audit: Arc<AuditLog>,
}

impl PartnerHandler {
	pub fn new(store: Arc<PartnerStore>, audit: Arc<AuditLog>) -> Self {
		Self { store, audit }
	}

	/// Registers a partner profile as pending approval.
	#[instrument(skip_all, fields(partner = %draft.name))]
	pub async fn register(
		&self,
		draft: PartnerDraft,
		actor: &Actor,
	) -> Result<Partner, PartnerStoreError> {
		let partner = self.store.register(draft, actor).await?;
		self.record(
			AuditAction::PartnerRegistered,
			format!("Partner {} registered", partner.name),
			&partner.id,
			actor,
		)
		.await;
		Ok(partner)
	}

	/// Approves a pending partner.
	pub async fn approve(&self, id: &str, actor: &Actor) -> Result<Partner, PartnerStoreError> {
		self.set_status(id, PartnerStatus::Active, actor).await
	}

	/// Takes a partner out of rotation.
	pub async fn deactivate(&self, id: &str, actor: &Actor) -> Result<Partner, PartnerStoreError> {
		self.set_status(id, PartnerStatus::Deactivated, actor).await
	}

	/// Moves a partner to the given status.
	#[instrument(skip_all, fields(partner_id = %id, status = %status))]
	pub async fn set_status(
		&self,
		id: &str,
		status: PartnerStatus,
		actor: &Actor,
	) -> Result<Partner, PartnerStoreError> {
		let partner = self.store.set_status(id, status, actor).await?;
		self.record(
			AuditAction::PartnerStatusChanged,
			format!("Partner {} changed to {}", partner.name, partner.status),
			&partner.id,
			actor,
		)
		.await;
		tracing::info!(partner_id = %partner.id, status = %partner.status, "partner status changed");
		Ok(partner)
	}

	/// Fetches a partner by identifier.
	pub async fn get(&self, id: &str) -> Result<Partner, PartnerStoreError> {
		self.store.get(id).await
	}

	/// Lists all partners. Admin only.
	pub async fn list(&self, actor: &Actor) -> Result<Vec<Partner>, PartnerStoreError> {
		self.store.list(actor).await
	}

	async fn record(&self, action: AuditAction, detail: String, entity_id: &str, actor: &Actor) {
		let entry = AuditLogEntry::new(Utc::now(), actor.name.clone(), action, detail, entity_id);
		if let Err(err) = self.audit.record(entry).await {
			tracing::warn!(entity_id, error = %err, "audit emission failed, change kept");
		}
	}
}
