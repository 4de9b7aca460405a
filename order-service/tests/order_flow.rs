//! `/order` against a real payment service running in-process.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use order_service::OrderServer;
use payments_client::PaymentsClient;
use payments_hex::{PaymentService, ServiceConfig, inbound::HttpServer, outbound::FixedRegion};
use payments_repo::SqliteStore;
use payments_types::PaymentStore;
use tempfile::TempDir;
use tower::ServiceExt;

/// Starts a payment service on an ephemeral port and returns its base URL.
async fn spawn_payment_service(config: ServiceConfig) -> (TempDir, SqliteStore, String) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("payments.db").display());
    let store = SqliteStore::new(&url).await.unwrap();
    let probe = SqliteStore::from_router(payments_repo::ReplicaRouter::new(
        store.router().primary().clone(),
    ));

    let service =
        PaymentService::new(store, FixedRegion::new("asia-southeast2")).with_config(config);
    let app = HttpServer::new(service, "id").router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (dir, probe, format!("http://{}", addr))
}

fn order_request() -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/order")
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_order_relays_created_payment() {
    let (_dir, store, base_url) = spawn_payment_service(ServiceConfig::default()).await;
    let app = OrderServer::new(PaymentsClient::new(base_url)).router();

    let response = app.oneshot(order_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = store.list_recent(20).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        body_text(response).await,
        format!(
            "merchant {} received payment 1000.000000 USD",
            stored[0].merchant_id
        )
    );
}

#[tokio::test]
async fn test_payment_failure_is_relayed_as_500() {
    let config = ServiceConfig {
        force_failure: true,
    };
    let (_dir, _store, base_url) = spawn_payment_service(config).await;
    let app = OrderServer::new(PaymentsClient::new(base_url)).router();

    let response = app.oneshot(order_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "failed to handle the request");
}

#[tokio::test]
async fn test_wrong_region_code_is_relayed_as_500() {
    let (_dir, _store, base_url) = spawn_payment_service(ServiceConfig::default()).await;
    let client = PaymentsClient::new(base_url).with_region_code("sg");
    let app = OrderServer::new(client).router();

    let response = app.oneshot(order_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unreachable_payment_service_is_500() {
    let app = OrderServer::new(PaymentsClient::new("http://127.0.0.1:1")).router();

    let response = app.oneshot(order_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_get_order_is_not_allowed() {
    let app = OrderServer::new(PaymentsClient::new("http://127.0.0.1:1")).router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/order")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
