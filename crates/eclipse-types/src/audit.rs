//! Audit trail types.
//!
//! Successful mutations emit one entry each to an append-only log. The
//! log is best-effort: recording is never allowed to roll back the
//! operation it describes.

use crate::utils::prefixed_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag classifying what an audit entry records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AuditAction {
	OrderPlaced,
	OrderUpdated,
	OrderStatusChanged,
	/// Admin set the status directly, bypassing the transition table.
	StatusOverridden,
	PartnerRegistered,
	PartnerStatusChanged,
	RateUpdated,
}

impl fmt::Display for AuditAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AuditAction::OrderPlaced => write!(f, "Order Placed"),
			AuditAction::OrderUpdated => write!(f, "Order Updated"),
			AuditAction::OrderStatusChanged => write!(f, "Order Status Changed"),
			AuditAction::StatusOverridden => write!(f, "Status Overridden"),
			AuditAction::PartnerRegistered => write!(f, "Partner Registered"),
			AuditAction::PartnerStatusChanged => write!(f, "Partner Status Changed"),
			AuditAction::RateUpdated => write!(f, "Rate Updated"),
		}
	}
}

/// One append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
	/// Unique identifier for this entry.
	pub id: String,
	/// When the recorded action happened.
	pub timestamp: DateTime<Utc>,
	/// Display name of the acting user.
	pub actor: String,
	/// What kind of action was taken.
	pub action: AuditAction,
	/// Human-readable description of the change.
	pub detail: String,
	/// Identifier of the order, partner, or rate the entry concerns.
	pub entity_id: String,
}

impl AuditLogEntry {
	/// Creates an entry stamped with the given time.
	pub fn new(
		timestamp: DateTime<Utc>,
		actor: impl Into<String>,
		action: AuditAction,
		detail: impl Into<String>,
		entity_id: impl Into<String>,
	) -> Self {
		Self {
			id: prefixed_id("log"),
			timestamp,
			actor: actor.into(),
			action,
			detail: detail.into(),
			entity_id: entity_id.into(),
		}
	}
}
