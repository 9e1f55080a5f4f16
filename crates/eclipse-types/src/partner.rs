//! Service-partner profile types.
//!
//! Partners are the businesses doing the ironing. They register as
//! pending and are approved or deactivated by an administrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval status of a partner profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PartnerStatus {
	/// Registered but not yet approved; initial state.
	PendingApproval,
	/// Approved and eligible for order assignment.
	Active,
	/// Taken out of rotation by an administrator.
	Deactivated,
}

impl fmt::Display for PartnerStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PartnerStatus::PendingApproval => write!(f, "Pending Approval"),
			PartnerStatus::Active => write!(f, "Active"),
			PartnerStatus::Deactivated => write!(f, "Deactivated"),
		}
	}
}

/// A service-provider profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
	/// Unique identifier for this partner.
	pub id: String,
	/// Business name.
	pub name: String,
	/// Contact email.
	pub email: String,
	/// Contact phone number.
	pub contact: String,
	/// Business address.
	pub address: String,
	/// Approval status; moved only by Admin action.
	pub status: PartnerStatus,
	/// Linked user account, once one exists.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
}

/// Input to partner registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDraft {
	pub name: String,
	pub email: String,
	pub contact: String,
	pub address: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
}
