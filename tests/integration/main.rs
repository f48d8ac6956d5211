//! Beacon integration test harness.
//!
//! Each test spins up the full HTTP API on an ephemeral loopback port,
//! with the staleness sweep wired the way beacond wires it, plus UDP
//! responders standing in for game servers. Everything runs in-process
//! over loopback; no privileges or fixed ports required.

mod pruning;
mod registration;

use beacon_api::ApiState;
use beacon_core::config::RegistryConfig;
use beacon_core::Limits;
use beacon_services::{sweep_loop, Registry, ServerStore};
use tokio::net::UdpSocket;
use tokio::sync::broadcast;

// ── Harness ───────────────────────────────────────────────────────────────────

pub struct TestDaemon {
    /// Base URL of the API, e.g. "http://127.0.0.1:39123/api".
    pub base: String,
    pub store: ServerStore,
    // Keeps the sweep alive; dropping it shuts the sweep down.
    _shutdown: broadcast::Sender<()>,
}

/// Registry policy used by most tests: fast probe, no re-probing.
pub fn default_policy() -> RegistryConfig {
    RegistryConfig {
        stale_threshold_secs: 30,
        probe_timeout_secs: 1,
        reprobe_on_update: false,
    }
}

/// Start the API and sweep with the given policy.
pub async fn spawn_daemon(policy: RegistryConfig) -> TestDaemon {
    let store = ServerStore::new();
    let registry = Registry::new(store.clone(), Limits::default(), &policy);

    let (shutdown_tx, _) = broadcast::channel(1);
    tokio::spawn(sweep_loop(
        store.clone(),
        policy.stale_threshold(),
        shutdown_tx.subscribe(),
    ));

    let state = ApiState {
        registry,
        store: store.clone(),
        stale_threshold_secs: policy.stale_threshold_secs,
        started_at: std::time::Instant::now(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind API listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = beacon_api::serve_on(listener, state).await;
    });

    TestDaemon {
        base: format!("http://{addr}/api"),
        store,
        _shutdown: shutdown_tx,
    }
}

/// A fake game server on loopback that answers every probe with "pong".
/// Returns the `ip:port` string to claim. Runs until the test ends.
pub async fn spawn_game_server() -> String {
    spawn_responder(b"pong").await
}

/// A misbehaving listener that answers probes with the wrong payload.
pub async fn spawn_rejecting_server() -> String {
    spawn_responder(b"nope").await
}

async fn spawn_responder(reply: &'static [u8]) -> String {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind responder");
    let addr = socket.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 16];
        while let Ok((_, from)) = socket.recv_from(&mut buf).await {
            let _ = socket.send_to(reply, from).await;
        }
    });
    addr.to_string()
}

/// An `ip:port` on loopback with nothing listening behind it.
pub async fn dead_address() -> String {
    let socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind probe");
    socket.local_addr().unwrap().to_string()
}
