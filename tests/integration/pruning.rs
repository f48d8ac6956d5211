use crate::*;

use std::time::Duration;

use serde_json::{json, Value};

async fn register(daemon: &TestDaemon, server: &str, name: &str) -> u16 {
    let resp = reqwest::Client::new()
        .post(format!("{}/servers/{}", daemon.base, server))
        .json(&json!({ "name": name, "game_version": 1, "is_joinable": true }))
        .send()
        .await
        .unwrap();
    resp.status().as_u16()
}

async fn list_len(daemon: &TestDaemon) -> usize {
    let servers: Value = reqwest::get(format!("{}/servers", daemon.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    servers.as_array().unwrap().len()
}

#[tokio::test]
async fn stale_registration_is_swept() {
    let mut policy = default_policy();
    policy.stale_threshold_secs = 1;
    let daemon = spawn_daemon(policy).await;
    let server = spawn_game_server().await;

    assert_eq!(register(&daemon, &server, "My Server").await, 201);
    assert_eq!(list_len(&daemon).await, 1);

    // Worst-case survival is 1.5 × threshold; 3 × is comfortably past it.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(list_len(&daemon).await, 0);
}

#[tokio::test]
async fn refreshed_registration_survives_the_sweep() {
    let mut policy = default_policy();
    policy.stale_threshold_secs = 2;
    let daemon = spawn_daemon(policy).await;
    let server = spawn_game_server().await;

    assert_eq!(register(&daemon, &server, "My Server").await, 201);

    // Keep refreshing for longer than the unrefreshed survival bound.
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(register(&daemon, &server, "My Server").await, 200);
    }

    assert_eq!(list_len(&daemon).await, 1);
}
