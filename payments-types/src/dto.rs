//! Data Transfer Objects shared with callers of the payment API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{MerchantId, Payment, PaymentId};

/// Read-only projection of a payment as seen by downstream services.
///
/// Same JSON shape as [`Payment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub value: f64,
    pub merchant_id: MerchantId,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentResponse {
    /// Human-readable receipt line.
    pub fn summary(&self) -> String {
        format!(
            "merchant {} received payment {:.6} USD",
            self.merchant_id, self.value
        )
    }
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            value: p.value,
            merchant_id: p.merchant_id,
            region: p.region,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
