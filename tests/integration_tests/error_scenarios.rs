//! Error scenario integration tests
//!
//! Tests various failure modes and error handling:
//! 1. Connection failures
//! 2. HTTP error responses (401, 400, 5xx)
//! 3. Malformed payloads
//! 4. Retry logic for reads, none for the completion POST

use std::time::Duration;

use equilibrium_admin::gateway::{
    ClientConfig, GatewayError, GatewayErrorKind, HttpGateway, RemoteGateway,
};
use equilibrium_admin::queue::{FlightPolicy, QueueCoordinator, QueueError};
use equilibrium_admin::utils::retry::RetryConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::queue_entry_json;

fn gateway_with_retries(server: &MockServer, retries: u32) -> HttpGateway {
    let config = ClientConfig::new(format!("{}/api", server.uri()))
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig::with_delays(retries, 10, 50));
    HttpGateway::new(config).unwrap()
}

// ============================================================================
// Network Error Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    let config = ClientConfig::new("http://127.0.0.1:1/api")
        .with_timeout(Duration::from_secs(1))
        .with_retry(RetryConfig::none());
    let gateway = HttpGateway::new(config).unwrap();

    let err = gateway.fetch_queue().await.unwrap_err();
    assert_eq!(err.kind(), GatewayErrorKind::Transport);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/api", server.uri()))
        .with_timeout(Duration::from_millis(100))
        .with_retry(RetryConfig::none());
    let gateway = HttpGateway::new(config).unwrap();

    let err = gateway.fetch_queue().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}

// ============================================================================
// HTTP Error Tests
// ============================================================================

#[tokio::test]
async fn test_server_error_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([queue_entry_json(1, 10)])))
        .mount(&server)
        .await;

    let entries = gateway_with_retries(&server, 2).fetch_queue().await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_unauthorized_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/structure/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_with_retries(&server, 3)
        .fetch_structure()
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::Unauthorized);
}

#[tokio::test]
async fn test_completion_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/complete/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_with_retries(&server, 3)
        .submit_completion(42)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_completion_detail_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/complete/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "No pending payment found."})),
        )
        .mount(&server)
        .await;

    let coordinator =
        QueueCoordinator::new(gateway_with_retries(&server, 0), FlightPolicy::PerEntry);
    let err = coordinator.complete(42).await.unwrap_err();

    match &err {
        QueueError::CompletionFailed { user_id, source } => {
            assert_eq!(*user_id, 42);
            assert_eq!(
                source,
                &GatewayError::Status {
                    status: 400,
                    message: "No pending payment found.".to_string()
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(coordinator.last_error(), Some(err));
    assert!(!coordinator.is_busy(42));
}

// ============================================================================
// Malformed Payload Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_queue_keeps_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([queue_entry_json(1, 10)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let coordinator =
        QueueCoordinator::new(gateway_with_retries(&server, 0), FlightPolicy::PerEntry);
    coordinator.refresh().await.unwrap();

    let err = coordinator.refresh().await.unwrap_err();
    assert_eq!(err.gateway_error().kind(), GatewayErrorKind::Decode);
    assert_eq!(coordinator.snapshot().len(), 1);
    assert!(coordinator.last_error().is_some());
}

#[tokio::test]
async fn test_decode_error_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/structure/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_with_retries(&server, 3)
        .fetch_structure()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), GatewayErrorKind::Decode);
}
