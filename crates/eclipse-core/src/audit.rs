//! Storage-backed audit log.
//!
//! Implements the workflow engine's [`AuditSink`] over the shared
//! storage service. Entries are append-only; the read side feeds the
//! dashboards' recent-activity panels.

use async_trait::async_trait;
use eclipse_storage::StorageService;
use eclipse_types::{AuditLogEntry, StorageKey};
use eclipse_workflow::{AuditError, AuditSink};
use std::sync::Arc;

/// Append-only audit log over the storage service.
pub struct AuditLog {
	storage: Arc<StorageService>,
}

impl AuditLog {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Most recent entries, newest first.
	pub async fn recent(&self, limit: usize) -> Result<Vec<AuditLogEntry>, AuditError> {
		let mut entries = self.all().await?;
		entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
		entries.truncate(limit);
		Ok(entries)
	}

	/// Every entry touching the given order, partner, or rate, oldest
	/// first.
	pub async fn for_entity(&self, entity_id: &str) -> Result<Vec<AuditLogEntry>, AuditError> {
		let mut entries = self.all().await?;
		entries.retain(|e| e.entity_id == entity_id);
		entries.sort_by_key(|e| e.timestamp);
		Ok(entries)
	}

	async fn all(&self) -> Result<Vec<AuditLogEntry>, AuditError> {
		self.storage
			.retrieve_all(StorageKey::AuditLogs.as_str())
			.await
			.map_err(|e| AuditError::Sink(e.to_string()))
	}
}

#[async_trait]
impl AuditSink for AuditLog {
	async fn record(&self, entry: AuditLogEntry) -> Result<(), AuditError> {
		self.storage
			.store(StorageKey::AuditLogs.as_str(), &entry.id, &entry)
			.await
			.map_err(|e| AuditError::Sink(e.to_string()))
	}
}
