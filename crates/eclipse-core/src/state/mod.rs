//! Repositories owning the canonical collections.

pub mod order;
pub mod partner;

pub use order::{OrderStore, OrderStoreError};
pub use partner::{PartnerStore, PartnerStoreError};
