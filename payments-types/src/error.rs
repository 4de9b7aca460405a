//! Error types for the payment service.

/// Domain-level errors (validation failures).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Payment value must be a non-negative number, got {0}")]
    InvalidValue(f64),
}

/// Storage errors (data access failures).
///
/// The text of `Database` is the driver's own message; it is what callers
/// end up seeing in a 500 response.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Database(String),
}

/// Failure of an outbound call (instance metadata, downstream service).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UpstreamError(pub String);

/// Application-level errors (for HTTP responses).
///
/// Every variant maps to a 500 whose body is the error text.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Decode(String),

    #[error("failed to handle the request")]
    ForcedFailure,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_driver_text() {
        let err: AppError = StoreError::Database("connection refused".into()).into();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_forced_failure_text() {
        assert_eq!(
            AppError::ForcedFailure.to_string(),
            "failed to handle the request"
        );
    }
}
