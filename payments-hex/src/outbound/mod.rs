//! Outbound adapters.

pub mod metadata;

pub use metadata::{FixedRegion, GceMetadata};
