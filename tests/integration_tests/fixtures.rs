//! Test fixtures for integration tests
//!
//! Backend payloads shaped like the Equilibrium API responses.

use serde_json::{json, Value};

/// Structure payload: root, two children, one grandchild.
///
/// Shaped like the backend's node serializer: usernames for `user` and
/// `parent`, the tariff as a primary key, and every node repeated inside
/// its parent's `children`.
pub fn structure_json() -> Value {
    let carol = json!({"user": "carol", "parent": "alice", "position": 1, "level": 2, "tariff": null, "children": []});
    let alice = json!({"user": "alice", "parent": "root", "position": 1, "level": 1, "tariff": 1, "children": [carol.clone()]});
    let bob = json!({"user": "bob", "parent": "root", "position": 2, "level": 1, "tariff": 2, "children": []});
    let root = json!({"user": "root", "parent": null, "position": 1, "level": 0, "tariff": 1, "children": [alice.clone(), bob.clone()]});

    json!([root, alice, bob, carol])
}

/// One pending queue entry in the backend's serializer shape
pub fn queue_entry_json(id: u64, user: u64) -> Value {
    json!({
        "id": id,
        "user": user,
        "user_display": format!("user{user}"),
        "amount": "100.00",
        "status": "pending",
        "created_at": "2024-03-01T10:00:00Z",
        "inviter": "root",
        "tariff": {"code": "starter-100", "name": "Starter", "entry_amount": "100.00"}
    })
}

/// Successful completion response
pub fn completion_json() -> Value {
    json!({
        "detail": "Registration completed",
        "placement_parent": "alice",
        "level": 2
    })
}
