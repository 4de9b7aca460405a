//! Domain models for the payment service.

pub mod payment;

pub use payment::{MerchantId, NewPayment, Payment, PaymentId};
