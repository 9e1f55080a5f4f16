//! Pricing rate types.
//!
//! Rates map a cloth-type tag to a unit price. The tag is the unique key
//! used to price order line items.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a rate is quoted in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum RateUnit {
	PerPiece,
	PerKg,
}

impl fmt::Display for RateUnit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RateUnit::PerPiece => write!(f, "per piece"),
			RateUnit::PerKg => write!(f, "per kg"),
		}
	}
}

/// A pricing rate for one cloth type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
	/// Unique identifier for this rate.
	pub id: String,
	/// Cloth-type tag; unique key across the table.
	pub cloth_type: String,
	/// Unit price; always positive.
	pub price: Decimal,
	/// Unit the price is quoted in.
	pub unit: RateUnit,
	/// Date the price was last changed.
	pub last_updated: NaiveDate,
}

/// Input to a rate upsert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateDraft {
	pub cloth_type: String,
	pub price: Decimal,
	pub unit: RateUnit,
}
