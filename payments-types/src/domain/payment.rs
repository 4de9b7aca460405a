//! Payment domain model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a Payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random PaymentId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a PaymentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of the merchant receiving a payment.
///
/// Not checked against any merchant registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(Uuid);

impl MerchantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for MerchantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MerchantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MerchantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A persisted payment.
///
/// Payments are append-only: once stored they are never updated or deleted
/// through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier, assigned once at creation
    pub id: PaymentId,
    /// Amount received
    pub value: f64,
    /// Receiving merchant
    pub merchant_id: MerchantId,
    /// Region the payment was created in (best effort)
    pub region: String,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
    /// When the row was last written
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Reconstructs a payment from database fields.
    pub fn from_parts(
        id: PaymentId,
        value: f64,
        merchant_id: MerchantId,
        region: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            value,
            merchant_id,
            region,
            created_at,
            updated_at,
        }
    }
}

/// Input to the store's create operation.
///
/// `id` may be left empty; the store assigns one before inserting.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub id: Option<PaymentId>,
    pub value: f64,
    pub merchant_id: MerchantId,
    pub region: String,
}

impl NewPayment {
    /// Creates a payment input without an identifier.
    pub fn new(value: f64, merchant_id: MerchantId, region: impl Into<String>) -> Self {
        Self {
            id: None,
            value,
            merchant_id,
            region: region.into(),
        }
    }

    /// Sets the identifier explicitly.
    pub fn with_id(mut self, id: PaymentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Checks the value invariant.
    ///
    /// # Validation
    /// - Value must be a finite, non-negative number
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(DomainError::InvalidValue(self.value));
        }
        Ok(())
    }

    /// Validates and turns the input into the row about to be stored.
    ///
    /// Assigns a fresh identifier when none was supplied and stamps both
    /// timestamps with `now`, truncated to microseconds (the precision
    /// every backend keeps).
    pub fn into_payment(self, now: DateTime<Utc>) -> Result<Payment, DomainError> {
        self.validate()?;
        let now = now.trunc_subsecs(6);

        Ok(Payment {
            id: self.id.unwrap_or_default(),
            value: self.value,
            merchant_id: self.merchant_id,
            region: self.region,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_is_assigned() {
        let payment = NewPayment::new(1000.0, MerchantId::new(), "europe-west1")
            .into_payment(Utc::now())
            .unwrap();

        assert!(!payment.id.as_uuid().is_nil());
        assert_eq!(payment.created_at, payment.updated_at);
    }

    #[test]
    fn test_supplied_id_is_kept() {
        let id = PaymentId::new();
        let payment = NewPayment::new(1.5, MerchantId::new(), "r")
            .with_id(id)
            .into_payment(Utc::now())
            .unwrap();

        assert_eq!(payment.id, id);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = NewPayment::new(1.0, MerchantId::new(), "r")
            .into_payment(Utc::now())
            .unwrap();
        let b = NewPayment::new(1.0, MerchantId::new(), "r")
            .into_payment(Utc::now())
            .unwrap();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_negative_value_fails() {
        let result = NewPayment::new(-1.0, MerchantId::new(), "r").into_payment(Utc::now());
        assert!(matches!(result, Err(DomainError::InvalidValue(_))));
    }

    #[test]
    fn test_nan_value_fails() {
        let result = NewPayment::new(f64::NAN, MerchantId::new(), "r").validate();
        assert!(matches!(result, Err(DomainError::InvalidValue(_))));
    }

    #[test]
    fn test_zero_value_is_allowed() {
        assert!(NewPayment::new(0.0, MerchantId::new(), "r").validate().is_ok());
    }

    #[test]
    fn test_timestamps_truncated_to_micros() {
        let payment = NewPayment::new(1.0, MerchantId::new(), "r")
            .into_payment(Utc::now())
            .unwrap();

        assert_eq!(payment.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_json_field_names() {
        let payment = NewPayment::new(1000.0, MerchantId::new(), "asia-southeast2")
            .into_payment(Utc::now())
            .unwrap();

        let json = serde_json::to_value(&payment).unwrap();
        for field in ["id", "value", "merchant_id", "region", "created_at", "updated_at"] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["value"], 1000.0);
        assert_eq!(json["id"], payment.id.to_string());
    }
}
