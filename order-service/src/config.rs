//! Configuration loading from environment.

use std::env;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    /// `host[:port]` of the payment service.
    pub payment_service_host: String,
    pub payment_region_code: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8081".to_string())
            .parse()?;

        let payment_service_host = lookup("PAYMENT_SERVICE_HOST")
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("PAYMENT_SERVICE_HOST environment variable is required")
            })?;

        let payment_region_code = lookup("PAYMENT_REGION_CODE")
            .unwrap_or_else(|| payments_client::DEFAULT_REGION_CODE.to_string());

        Ok(Self {
            port,
            payment_service_host,
            payment_region_code,
        })
    }

    /// Base URL of the payment service.
    pub fn payment_service_url(&self) -> String {
        format!("http://{}", self.payment_service_host)
    }
}
