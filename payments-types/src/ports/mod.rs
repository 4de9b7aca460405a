//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod metadata;
mod store;

pub use metadata::InstanceMetadata;
pub use store::PaymentStore;
