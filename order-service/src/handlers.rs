//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payments_client::{ClientError, PaymentsClient};
use payments_types::AppError;

/// Application state shared across handlers.
pub struct AppState {
    pub payments: PaymentsClient,
}

/// Failed order, rendered as a 500 with the error text.
#[derive(Debug)]
pub struct OrderError(pub AppError);

impl From<ClientError> for OrderError {
    fn from(err: ClientError) -> Self {
        let text = err.to_string();
        OrderError(match err {
            ClientError::Json(_) => AppError::Decode(text),
            ClientError::Http(_) | ClientError::Api { .. } => AppError::Upstream(text),
        })
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

/// Place an order: one call to the payment service, no retry.
#[tracing::instrument(skip(state))]
pub async fn order(State(state): State<Arc<AppState>>) -> Result<String, OrderError> {
    let payment = state.payments.create_payment().await.map_err(|e| {
        tracing::error!(error = %e, "payment call failed");
        OrderError::from(e)
    })?;

    tracing::info!(payment_id = %payment.id, "order paid");
    Ok(payment.summary())
}
