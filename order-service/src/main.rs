//! # Order Server
//!
//! Binary that wires together:
//! - Configuration from environment
//! - The payment service client
//! - The order HTTP server

mod config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_service::OrderServer;
use payments_client::PaymentsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,order_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env()?;

    tracing::info!("Starting order server on port {}", config.port);
    tracing::info!("Using payment service: {}", config.payment_service_url());

    let payments = PaymentsClient::new(config.payment_service_url())
        .with_region_code(config.payment_region_code);

    let server = OrderServer::new(payments);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await
}
