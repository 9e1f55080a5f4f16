//! Builder wiring the core's services together.
//!
//! Assembles storage, rate table, audit log, workflow service, and the
//! repositories into a [`Core`]. Defaults give the prototype setup: an
//! in-memory backend and the stock configuration.

use crate::audit::AuditLog;
use crate::config::CoreConfig;
use crate::handlers::{OrderHandler, PartnerHandler};
use crate::state::{OrderStore, PartnerStore};
use crate::Core;
use chrono::Duration;
use eclipse_pricing::RateService;
use eclipse_storage::{MemoryStorage, StorageInterface, StorageService};
use eclipse_workflow::WorkflowService;
use std::sync::Arc;

/// Builder for [`Core`].
pub struct CoreBuilder {
	config: CoreConfig,
	backend: Option<Box<dyn StorageInterface>>,
}

impl CoreBuilder {
	pub fn new() -> Self {
		Self {
			config: CoreConfig::default(),
			backend: None,
		}
	}

	/// Uses the given configuration instead of the defaults.
	pub fn with_config(mut self, config: CoreConfig) -> Self {
		self.config = config;
		self
	}

	/// Uses the given storage backend instead of a fresh in-memory one.
	pub fn with_backend(mut self, backend: Box<dyn StorageInterface>) -> Self {
		self.backend = Some(backend);
		self
	}

	/// Wires everything together.
	pub fn build(self) -> Core {
		let backend = self
			.backend
			.unwrap_or_else(|| Box::new(MemoryStorage::new()));
		let storage = Arc::new(StorageService::new(backend));

		let rates = Arc::new(RateService::new(storage.clone()));
		let audit = Arc::new(AuditLog::new(storage.clone()));
		let workflow = Arc::new(WorkflowService::new(audit.clone()));
		let orders = Arc::new(OrderStore::new(
			storage.clone(),
			rates.clone(),
			Duration::hours(self.config.sla.window_hours),
		));
		let partners = Arc::new(PartnerStore::new(storage));

		Core {
			orders: OrderHandler::new(orders, workflow, audit.clone()),
			partners: PartnerHandler::new(partners, audit.clone()),
			rates,
			audit,
			config: self.config,
		}
	}
}

impl Default for CoreBuilder {
	fn default() -> Self {
		Self::new()
	}
}
