//! Storage-related types for the workflow core.

use std::str::FromStr;

/// Storage keys for the canonical data collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Key for the order collection
	Orders,
	/// Key for the partner collection
	Partners,
	/// Key for the pricing-rate collection
	Rates,
	/// Key for the append-only audit log
	AuditLogs,
}

impl StorageKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Orders => "orders",
			StorageKey::Partners => "partners",
			StorageKey::Rates => "rates",
			StorageKey::AuditLogs => "audit_logs",
		}
	}

	/// Returns an iterator over all StorageKey variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Orders, Self::Partners, Self::Rates, Self::AuditLogs].into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"orders" => Ok(Self::Orders),
			"partners" => Ok(Self::Partners),
			"rates" => Ok(Self::Rates),
			"audit_logs" => Ok(Self::AuditLogs),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}
