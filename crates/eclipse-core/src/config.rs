//! Runtime configuration for the workflow core.
//!
//! A small TOML file tunes the SLA window and the recent-activity feed.
//! Every section is optional; omitted sections fall back to the defaults
//! the prototype shipped with.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs when the config file cannot be read.
	#[error("Failed to read config file: {0}")]
	Io(String),
	/// Error that occurs when the file is not valid TOML.
	#[error("Failed to parse config: {0}")]
	Parse(String),
	/// Error that occurs when a value is outside its allowed range.
	#[error("Invalid config: {0}")]
	Invalid(String),
}

/// SLA tuning.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlaConfig {
	/// Hours from order creation to the due timestamp.
	pub window_hours: i64,
}

impl Default for SlaConfig {
	fn default() -> Self {
		Self { window_hours: 24 }
	}
}

/// Audit feed tuning.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuditConfig {
	/// Number of entries in the recent-activity feed.
	pub recent_limit: usize,
}

impl Default for AuditConfig {
	fn default() -> Self {
		Self { recent_limit: 5 }
	}
}

/// Top-level core configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
	pub sla: SlaConfig,
	pub audit: AuditConfig,
}

impl CoreConfig {
	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
		let config: CoreConfig =
			toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses, and validates a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
		Self::from_toml_str(&raw)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if !(1..=168).contains(&self.sla.window_hours) {
			return Err(ConfigError::Invalid(format!(
				"sla.window_hours must be between 1 and 168, got {}",
				self.sla.window_hours
			)));
		}
		if self.audit.recent_limit == 0 {
			return Err(ConfigError::Invalid(
				"audit.recent_limit must be at least 1".to_string(),
			));
		}
		Ok(())
	}
}
