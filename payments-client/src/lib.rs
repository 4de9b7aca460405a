//! # Payments Client SDK
//!
//! A typed Rust client for the payment service API.
//! One request per call: no retries and no client-side timeout.

use payments_types::PaymentResponse;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Region code used when none is configured.
pub const DEFAULT_REGION_CODE: &str = "id";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Payment service API client.
pub struct PaymentsClient {
    base_url: String,
    region_code: String,
    http: Client,
}

impl PaymentsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            region_code: DEFAULT_REGION_CODE.to_string(),
            http: Client::new(),
        }
    }

    /// Sets the region code segment of the API path.
    pub fn with_region_code(mut self, region_code: impl Into<String>) -> Self {
        self.region_code = region_code.into();
        self
    }

    fn api_path(&self) -> String {
        format!("/payments/{}/api/v1/", self.region_code)
    }

    /// Raw identity payload of the payment service instance.
    ///
    /// The response status is not inspected; the body is returned as is.
    pub async fn identify(&self) -> Result<Vec<u8>, ClientError> {
        let resp = self.http.get(format!("{}/", self.base_url)).send().await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Lists the most recent payments.
    pub async fn list_payments(&self) -> Result<Vec<PaymentResponse>, ClientError> {
        self.get(&self.api_path()).await
    }

    /// Asks the payment service to create a payment.
    pub async fn create_payment(&self) -> Result<PaymentResponse, ClientError> {
        self.post(&self.api_path()).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            tracing::debug!(status = status.as_u16(), "payment service returned an error");
            Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_client_creation() {
        let client = PaymentsClient::new("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.api_path(), "/payments/id/api/v1/");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = PaymentsClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_client_with_region_code() {
        let client = PaymentsClient::new("http://localhost:8080").with_region_code("sg");
        assert_eq!(client.api_path(), "/payments/sg/api/v1/");
    }

    #[tokio::test]
    async fn test_create_payment_decodes_body() {
        let body = r#"{"id":"6f1c1b7e-2a4d-4c55-9a43-0b7d5c1e9f10","value":1000,
            "merchant_id":"0d3e5b51-8a53-4d0e-b1c4-3f0c2f9a7d11","region":"12345",
            "created_at":"2024-05-01T10:00:00.000001Z","updated_at":"2024-05-01T10:00:00.000001Z"}"#;
        let app = Router::new().route("/payments/id/api/v1/", post(move || async move { body }));
        let client = PaymentsClient::new(spawn(app).await);

        let payment = client.create_payment().await.unwrap();

        assert_eq!(payment.value, 1000.0);
        assert_eq!(payment.region, "12345");
        assert_eq!(
            payment.merchant_id.to_string(),
            "0d3e5b51-8a53-4d0e-b1c4-3f0c2f9a7d11"
        );
    }

    #[tokio::test]
    async fn test_list_payments_decodes_array() {
        let body = r#"[
            {"id":"6f1c1b7e-2a4d-4c55-9a43-0b7d5c1e9f10","value":1000,
             "merchant_id":"0d3e5b51-8a53-4d0e-b1c4-3f0c2f9a7d11","region":"r2",
             "created_at":"2024-05-01T10:00:01Z","updated_at":"2024-05-01T10:00:01Z"},
            {"id":"1a2b3c4d-0000-4000-8000-000000000001","value":1000,
             "merchant_id":"1a2b3c4d-0000-4000-8000-000000000002","region":"r1",
             "created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}
        ]"#;
        let app = Router::new().route("/payments/sg/api/v1/", get(move || async move { body }));
        let client = PaymentsClient::new(spawn(app).await).with_region_code("sg");

        let payments = client.list_payments().await.unwrap();

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].region, "r2");
        assert_eq!(
            payments[1].id.to_string(),
            "1a2b3c4d-0000-4000-8000-000000000001"
        );
    }

    #[tokio::test]
    async fn test_list_payments_error_status_is_api_error() {
        let app = Router::new().route(
            "/payments/id/api/v1/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "pool timed out") }),
        );
        let client = PaymentsClient::new(spawn(app).await);

        let err = client.list_payments().await.unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "pool timed out");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identify_returns_raw_body() {
        let app = Router::new().route(
            "/",
            get(|| async { "projects/123456/regions/asia-southeast2" }),
        );
        let client = PaymentsClient::new(spawn(app).await);

        let body = client.identify().await.unwrap();

        assert_eq!(body, b"projects/123456/regions/asia-southeast2");
    }

    #[tokio::test]
    async fn test_identify_passes_error_status_body_through() {
        let app = Router::new().route(
            "/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "lookup failed") }),
        );
        let client = PaymentsClient::new(spawn(app).await);

        assert_eq!(client.identify().await.unwrap(), b"lookup failed");
    }

    #[tokio::test]
    async fn test_error_status_keeps_body_text() {
        let app = Router::new().route(
            "/payments/id/api/v1/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "failed to handle the request") }),
        );
        let client = PaymentsClient::new(spawn(app).await);

        let err = client.create_payment().await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 500, .. }));
        assert_eq!(err.to_string(), "failed to handle the request");
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let app = Router::new().route("/payments/id/api/v1/", post(|| async { "not json" }));
        let client = PaymentsClient::new(spawn(app).await);

        let err = client.create_payment().await.unwrap_err();

        assert!(matches!(err, ClientError::Json(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let client = PaymentsClient::new("http://127.0.0.1:1");

        let err = client.create_payment().await.unwrap_err();

        assert!(matches!(err, ClientError::Http(_)));
    }
}
