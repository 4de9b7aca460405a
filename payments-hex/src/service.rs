//! Payment Application Service
//!
//! Binds the payment operations to the record store and the instance
//! metadata port. Contains NO infrastructure logic.

use payments_types::{
    AppError, InstanceMetadata, MerchantId, NewPayment, Payment, PaymentId, PaymentStore,
};

/// Number of payments returned by the list operation.
pub const RECENT_PAYMENTS_LIMIT: u32 = 20;

/// Value given to every payment created through the API.
pub const PLACEHOLDER_VALUE: f64 = 1000.0;

/// Region recorded when the metadata lookup fails.
pub const FALLBACK_REGION: &str = "12345";

/// Runtime switches for the service.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Fail every list/create request without touching the store.
    pub force_failure: bool,
}

/// Application service for payment operations.
///
/// Generic over `S: PaymentStore` - the adapter is injected at compile time.
/// The metadata source is a trait object since it only sits on the create
/// and identify paths.
pub struct PaymentService<S: PaymentStore> {
    store: S,
    metadata: Box<dyn InstanceMetadata>,
    config: ServiceConfig,
}

impl<S: PaymentStore> PaymentService<S> {
    /// Creates a new payment service with the given store and metadata source.
    pub fn new(store: S, metadata: impl InstanceMetadata) -> Self {
        Self {
            store,
            metadata: Box::new(metadata),
            config: ServiceConfig::default(),
        }
    }

    /// Applies runtime switches.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Raw region descriptor, or the lookup error text.
    pub async fn identify(&self) -> Vec<u8> {
        match self.metadata.region().await {
            Ok(region) => region,
            Err(e) => e.to_string().into_bytes(),
        }
    }

    /// Lists the most recent payments.
    pub async fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        self.check_forced_failure()?;

        self.store
            .list_recent(RECENT_PAYMENTS_LIMIT)
            .await
            .map_err(Into::into)
    }

    /// Creates a payment with server-chosen value and merchant.
    ///
    /// Not idempotent: every call stores a new row.
    pub async fn create_payment(&self) -> Result<Payment, AppError> {
        self.check_forced_failure()?;

        let region = self.resolve_region().await;
        let payment = NewPayment::new(PLACEHOLDER_VALUE, MerchantId::new(), region)
            .with_id(PaymentId::new());

        let payment = self.store.create(payment).await?;
        tracing::info!(payment_id = %payment.id, region = %payment.region, "payment created");
        Ok(payment)
    }

    /// Single metadata lookup; any failure falls back to [`FALLBACK_REGION`].
    async fn resolve_region(&self) -> String {
        match self.metadata.region().await {
            Ok(region) => String::from_utf8_lossy(&region).into_owned(),
            Err(e) => {
                tracing::warn!(error = %e, "region lookup failed, using fallback");
                FALLBACK_REGION.to_string()
            }
        }
    }

    fn check_forced_failure(&self) -> Result<(), AppError> {
        if self.config.force_failure {
            return Err(AppError::ForcedFailure);
        }
        Ok(())
    }
}
