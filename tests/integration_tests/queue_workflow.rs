//! Queue workflow integration tests
//!
//! Drives `QueueCoordinator` over `HttpGateway` against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use equilibrium_admin::gateway::{ClientConfig, HttpGateway};
use equilibrium_admin::queue::{CompletionOutcome, FlightPolicy, Phase, QueueCoordinator};
use equilibrium_admin::utils::retry::RetryConfig;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::{completion_json, queue_entry_json};

fn coordinator(server: &MockServer) -> QueueCoordinator<HttpGateway> {
    let config = ClientConfig::new(format!("{}/api", server.uri()))
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig::none());
    let gateway = HttpGateway::new(config).unwrap();
    QueueCoordinator::new(gateway, FlightPolicy::PerEntry)
}

#[tokio::test]
async fn test_complete_then_refresh_removes_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([queue_entry_json(7, 42)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/complete/"))
        .and(body_json(json!({"user_id": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json()))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    coordinator.refresh().await.unwrap();
    assert_eq!(coordinator.snapshot()[0].id, 7);

    let outcome = coordinator.complete(42).await.unwrap();

    match outcome {
        CompletionOutcome::Completed { receipt, refreshed } => {
            assert!(refreshed);
            assert_eq!(receipt.placement_parent.as_deref(), Some("alice"));
            assert_eq!(receipt.level, Some(2));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(coordinator.snapshot().iter().all(|e| e.id != 7));
    assert!(!coordinator.is_busy(42));
    assert_eq!(coordinator.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_duplicate_complete_sends_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/complete/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json())
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let coordinator = Arc::new(coordinator(&server));
    let first = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.complete(42).await }
    });

    let mut rx = coordinator.subscribe();
    rx.wait_for(|s| s.is_busy(42)).await.unwrap();

    let second = coordinator.complete(42).await.unwrap();
    assert_eq!(second, CompletionOutcome::Rejected);

    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, CompletionOutcome::Completed { .. }));
    assert!(!coordinator.is_busy(42));
}

#[tokio::test]
async fn test_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .and(header("authorization", "Token secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([queue_entry_json(1, 10)])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/api/", server.uri()))
        .with_token("secret-token")
        .with_retry(RetryConfig::none());
    let coordinator =
        QueueCoordinator::new(HttpGateway::new(config).unwrap(), FlightPolicy::PerEntry);

    assert_eq!(coordinator.refresh().await.unwrap(), 1);
}

#[tokio::test]
async fn test_distinct_entries_complete_concurrently() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/complete/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_json())
                .set_delay(Duration::from_millis(100)),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/queue/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    let (a, b) = futures::future::join(coordinator.complete(1), coordinator.complete(2)).await;

    assert!(matches!(a.unwrap(), CompletionOutcome::Completed { .. }));
    assert!(matches!(b.unwrap(), CompletionOutcome::Completed { .. }));
    assert_eq!(coordinator.phase(), Phase::Idle);
}
