//! # Payments Types
//!
//! Domain types and port traits for the payment service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Payment, PaymentId, MerchantId)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Projections shared with callers of the payment API
//! - `error/` - Domain, storage, upstream and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{MerchantId, NewPayment, Payment, PaymentId};
pub use dto::*;
pub use error::{AppError, DomainError, StoreError, UpstreamError};
pub use ports::{InstanceMetadata, PaymentStore};
