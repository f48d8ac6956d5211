use crate::*;

use serde_json::{json, Value};

fn submission(name: &str) -> Value {
    json!({ "name": name, "game_version": 3, "is_joinable": true })
}

#[tokio::test]
async fn register_rename_remove_lifecycle() {
    let daemon = spawn_daemon(default_policy()).await;
    let server = spawn_game_server().await;
    let client = reqwest::Client::new();
    let url = format!("{}/servers/{}", daemon.base, server);

    // First contact: probed, then created.
    let resp = client
        .post(&url)
        .json(&submission("My Server"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "registered");

    // Refresh under the same identity replaces the entry.
    let resp = client
        .post(&url)
        .json(&submission("Renamed"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["result"], "updated");

    let servers: Value = client
        .get(format!("{}/servers", daemon.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let servers = servers.as_array().unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0]["name"], "Renamed");
    assert_eq!(servers[0]["ip"], "127.0.0.1");
    assert_eq!(servers[0]["game_version"], 3);

    // Removal, then idempotent not-found.
    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let servers: Value = client
        .get(format!("{}/servers", daemon.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(servers.as_array().unwrap().is_empty());

    let resp = client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn unreachable_server_is_not_published() {
    let daemon = spawn_daemon(default_policy()).await;
    let claimed = dead_address().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/servers/{}", daemon.base, claimed))
        .json(&submission("My Server"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 412);
    assert!(daemon.store.is_empty());
}

#[tokio::test]
async fn wrong_probe_answer_is_not_published() {
    let daemon = spawn_daemon(default_policy()).await;
    let claimed = spawn_rejecting_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/servers/{}", daemon.base, claimed))
        .json(&submission("My Server"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 406);
    assert!(daemon.store.is_empty());
}

#[tokio::test]
async fn foreign_claim_is_forbidden() {
    let daemon = spawn_daemon(default_policy()).await;
    let client = reqwest::Client::new();

    // Request arrives from 127.0.0.1 but claims another host.
    let resp = client
        .post(format!("{}/servers/10.0.0.5:30000", daemon.base))
        .json(&submission("My Server"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    assert!(daemon.store.is_empty());

    let resp = client
        .delete(format!("{}/servers/10.0.0.5:30000", daemon.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn malformed_identity_is_a_bad_request() {
    let daemon = spawn_daemon(default_policy()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/servers/not-an-address", daemon.base))
        .json(&submission("My Server"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .delete(format!("{}/servers/not-an-address", daemon.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn invalid_name_is_a_bad_request() {
    let daemon = spawn_daemon(default_policy()).await;
    let server = spawn_game_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/servers/{}", daemon.base, server))
        .json(&submission("ab"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(daemon.store.is_empty());
}

#[tokio::test]
async fn getip_reflects_the_source_address() {
    let daemon = spawn_daemon(default_policy()).await;

    let body: Value = reqwest::get(format!("{}/getip", daemon.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ip"], "127.0.0.1");
}

#[tokio::test]
async fn status_reports_registered_count() {
    let daemon = spawn_daemon(default_policy()).await;
    let server = spawn_game_server().await;
    let client = reqwest::Client::new();

    let body: Value = reqwest::get(format!("{}/status", daemon.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["servers"], 0);
    assert_eq!(body["stale_threshold_secs"], 30);

    client
        .post(format!("{}/servers/{}", daemon.base, server))
        .json(&submission("My Server"))
        .send()
        .await
        .unwrap();

    let body: Value = reqwest::get(format!("{}/status", daemon.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["servers"], 1);
}
