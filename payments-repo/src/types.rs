//! Database row types and their conversion into the domain.

use sqlx::FromRow;

use payments_types::{MerchantId, Payment, PaymentId, StoreError};

#[cfg(feature = "postgres")]
use chrono::{DateTime, Utc};
#[cfg(feature = "postgres")]
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Payment row from PostgreSQL (native uuid / timestamptz columns).
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgPaymentRow {
    pub id: Uuid,
    pub value: f64,
    pub merchant_id: Uuid,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment row from SQLite (ids and timestamps stored as TEXT).
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqlitePaymentRow {
    pub id: String,
    pub value: f64,
    pub merchant_id: String,
    pub region: String,
    pub created_at: String,
    pub updated_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-width RFC 3339 (microseconds, `Z`), so text order is time order.
#[cfg(feature = "sqlite")]
pub fn format_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(feature = "sqlite")]
pub fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>, StoreError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| StoreError::Database(e.to_string()))
}

#[cfg(feature = "sqlite")]
pub fn parse_uuid(s: &str) -> Result<uuid::Uuid, StoreError> {
    uuid::Uuid::parse_str(s).map_err(|e| StoreError::Database(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
impl PgPaymentRow {
    /// Convert database row to domain Payment.
    pub fn into_domain(self) -> Result<Payment, StoreError> {
        Ok(Payment::from_parts(
            PaymentId::from_uuid(self.id),
            self.value,
            MerchantId::from_uuid(self.merchant_id),
            self.region,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[cfg(feature = "sqlite")]
impl SqlitePaymentRow {
    /// Convert database row to domain Payment.
    pub fn into_domain(self) -> Result<Payment, StoreError> {
        Ok(Payment::from_parts(
            PaymentId::from_uuid(parse_uuid(&self.id)?),
            self.value,
            MerchantId::from_uuid(parse_uuid(&self.merchant_id)?),
            self.region,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_timestamp_text_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = whole + chrono::Duration::microseconds(1);

        let a = format_timestamp(whole);
        let b = format_timestamp(later);

        assert_eq!(a, "2024-01-01T00:00:00.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = Utc.with_ymd_and_hms(2023, 6, 30, 12, 34, 56).unwrap()
            + chrono::Duration::microseconds(789);

        assert_eq!(parse_timestamp(&format_timestamp(ts)).unwrap(), ts);
    }

    #[test]
    fn test_bad_uuid_is_database_error() {
        assert!(matches!(parse_uuid("nope"), Err(StoreError::Database(_))));
    }
}
