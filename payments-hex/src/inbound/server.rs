//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use payments_types::PaymentStore;

use super::handlers::{self, AppState};
use crate::PaymentService;

/// HTTP Server for the Payments API.
pub struct HttpServer<S: PaymentStore> {
    state: Arc<AppState<S>>,
    region_code: String,
}

impl<S: PaymentStore> HttpServer<S> {
    /// Creates a new HTTP server serving the API under `region_code`.
    ///
    /// The code is a literal path segment (`/payments/{region_code}/api/v1/`).
    pub fn new(service: PaymentService<S>, region_code: impl Into<String>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            region_code: region_code.into(),
        }
    }

    /// Path prefix of the payment API.
    pub fn api_path(&self) -> String {
        format!("/payments/{}/api/v1/", self.region_code)
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::identify::<S>))
            .route(
                &self.api_path(),
                get(handlers::list_payments::<S>).post(handlers::create_payment::<S>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            "Payment service listening on {} (api {})",
            listener.local_addr()?,
            self.api_path()
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal_waits_for_a_signal() {
        let result = tokio::time::timeout(Duration::from_millis(50), shutdown_signal()).await;

        assert!(result.is_err());
    }
}
