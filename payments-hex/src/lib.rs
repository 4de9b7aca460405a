//! # Payments Hex
//!
//! Application service layer and HTTP adapters for the payment service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (list / create / identify)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `outbound/` - Instance metadata adapters (reqwest)
//!
//! The service is generic over `S: PaymentStore`, allowing
//! different store implementations to be injected.

pub mod inbound;
pub mod outbound;
pub mod service;


pub use service::{
    FALLBACK_REGION, PLACEHOLDER_VALUE, PaymentService, RECENT_PAYMENTS_LIMIT, ServiceConfig,
};
