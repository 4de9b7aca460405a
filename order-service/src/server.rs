//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use payments_client::PaymentsClient;
use payments_hex::inbound::shutdown_signal;

use crate::handlers::{self, AppState};

/// HTTP Server for the order API.
pub struct OrderServer {
    state: Arc<AppState>,
}

impl OrderServer {
    /// Creates a new server calling the payment service through `payments`.
    pub fn new(payments: PaymentsClient) -> Self {
        Self {
            state: Arc::new(AppState { payments }),
        }
    }

    /// Builds the Axum router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/order", post(handlers::order))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Order service listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
