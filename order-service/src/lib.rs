//! # Order Service
//!
//! Single-endpoint service: `POST /order` asks the payment service to create
//! a payment and answers with a one-line receipt.

mod handlers;
mod server;

pub use handlers::{AppState, OrderError};
pub use server::OrderServer;
