//! Utility functions for identifier generation.

use uuid::Uuid;

/// Generates a short prefixed identifier such as `ord-3f9a2c1b`.
///
/// The suffix is the first eight hex characters of a v4 UUID, which keeps
/// identifiers readable in logs while staying unique at this system's
/// scale.
pub fn prefixed_id(prefix: &str) -> String {
	let hex = Uuid::new_v4().simple().to_string();
	format!("{}-{}", prefix, &hex[..8])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefixed_id_shape() {
		let id = prefixed_id("ord");
		assert!(id.starts_with("ord-"));
		assert_eq!(id.len(), "ord-".len() + 8);
	}

	#[test]
	fn prefixed_ids_are_unique() {
		assert_ne!(prefixed_id("log"), prefixed_id("log"));
	}
}
