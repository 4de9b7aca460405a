//! Record store port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use crate::domain::{NewPayment, Payment};
use crate::error::StoreError;

/// Persistence of payments behind a minimal query surface.
///
/// Implementations send writes to the primary connection and reads to a
/// read-eligible connection (a replica when any are configured).
#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync + 'static {
    /// Persists one payment and returns the stored row.
    ///
    /// An identifier is assigned when `payment.id` is `None`.
    async fn create(&self, payment: NewPayment) -> Result<Payment, StoreError>;

    /// Returns up to `limit` payments, most recently created first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Payment>, StoreError>;
}
