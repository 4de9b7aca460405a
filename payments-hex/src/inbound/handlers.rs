//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payments_types::{AppError, PaymentStore};

use crate::PaymentService;

/// Application state shared across handlers.
pub struct AppState<S: PaymentStore> {
    pub service: PaymentService<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    /// Every failure is a 500 with the error text as a plain-text body.
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

/// Identity check: the instance region as raw bytes.
#[tracing::instrument(skip(state))]
pub async fn identify<S: PaymentStore>(State(state): State<Arc<AppState<S>>>) -> Vec<u8> {
    state.service.identify().await
}

/// List the most recent payments.
#[tracing::instrument(skip(state))]
pub async fn list_payments<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state.service.list_payments().await.inspect_err(|e| {
        tracing::error!(error = %e, "list payments failed");
    })?;
    Ok(Json(payments))
}

/// Create one payment.
#[tracing::instrument(skip(state))]
pub async fn create_payment<S: PaymentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.service.create_payment().await.inspect_err(|e| {
        tracing::error!(error = %e, "create payment failed");
    })?;
    Ok(Json(payment))
}
