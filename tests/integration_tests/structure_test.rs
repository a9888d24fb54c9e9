//! Structure loading integration tests

use equilibrium_admin::gateway::{ClientConfig, HttpGateway};
use equilibrium_admin::structure::{load_structure, MaterializeOptions, StructureStatus};
use equilibrium_admin::utils::retry::RetryConfig;
use equilibrium_admin::Ident;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::structure_json;

fn gateway(server: &MockServer) -> HttpGateway {
    let config =
        ClientConfig::new(format!("{}/api", server.uri())).with_retry(RetryConfig::none());
    HttpGateway::new(config).unwrap()
}

#[tokio::test]
async fn test_load_structure_groups_levels() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/structure/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(structure_json()))
        .mount(&server)
        .await;

    let tree = load_structure(&gateway(&server), &MaterializeOptions::default())
        .await
        .unwrap();

    assert_eq!(tree.status(), StructureStatus::Rooted);
    let levels: Vec<Vec<&str>> = tree
        .levels()
        .map(|l| l.nodes.iter().map(|n| n.user.as_str()).collect())
        .collect();
    assert_eq!(levels, vec![vec!["root"], vec!["alice", "bob"], vec!["carol"]]);
    assert_eq!(tree.depth_of(&Ident::from("carol")), Some(2));
    assert_eq!(tree.input_count(), 4);
    assert_eq!(tree.orphan_count(), 0);

    let root = &tree.levels().next().unwrap().nodes[0];
    assert_eq!(root.tariff, Some(Ident::from(1u64)));
}

#[tokio::test]
async fn test_load_empty_structure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/structure/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let tree = load_structure(&gateway(&server), &MaterializeOptions::default())
        .await
        .unwrap();

    assert_eq!(tree.status(), StructureStatus::Empty);
    assert_eq!(tree.input_count(), 0);
}

#[tokio::test]
async fn test_load_structure_without_root() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/structure/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"user": "alice", "parent": "ghost"},
            {"user": "bob", "parent": "alice"}
        ])))
        .mount(&server)
        .await;

    let tree = load_structure(&gateway(&server), &MaterializeOptions::default())
        .await
        .unwrap();

    assert_eq!(tree.status(), StructureStatus::NoRoot);
    assert_eq!(tree.input_count(), 2);
    assert_eq!(tree.levels().count(), 0);
}
