//! Actor and role types.
//!
//! Every mutating operation in the core is attributed to an actor: a user
//! identity plus the role it acts under. Authorization checks in the
//! repository and workflow engine are driven by these types rather than by
//! the calling layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a user acts under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Role {
	/// Full administrative access, including the status override path.
	Admin,
	/// Places orders and sees only their own.
	Customer,
	/// Accepts and works orders through the ironing stages.
	ServiceProvider,
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Admin => write!(f, "Admin"),
			Role::Customer => write!(f, "Customer"),
			Role::ServiceProvider => write!(f, "Service Provider"),
		}
	}
}

/// Read-only user reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Unique identifier for this user.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Contact email.
	pub email: String,
	/// Role the user holds.
	pub role: Role,
}

/// The identity attempting an operation.
///
/// Carries enough of the user record for authorization checks and audit
/// attribution without handing components the full user table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
	/// Identifier of the acting user.
	pub id: String,
	/// Display name, used for audit entries and denormalized references.
	pub name: String,
	/// Role the actor operates under.
	pub role: Role,
}

impl Actor {
	/// Creates a new actor from its identity parts.
	pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			role,
		}
	}

	/// Builds the actor view of a user record.
	pub fn from_user(user: &User) -> Self {
		Self::new(user.id.clone(), user.name.clone(), user.role)
	}

	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}
}
