//! beacond — Beacon server-discovery registry daemon.

use std::net::SocketAddr;
use std::time::Instant;

use anyhow::{Context, Result};

use beacon_api::ApiState;
use beacon_core::BeaconConfig;
use beacon_services::{sweep_loop, Registry, ServerStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = BeaconConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = BeaconConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        BeaconConfig::default()
    });

    let listen: SocketAddr = format!(
        "{}:{}",
        config.network.listen_addr, config.network.listen_port
    )
    .parse()
    .context("invalid listen address in config")?;

    tracing::info!(
        %listen,
        stale_threshold_secs = config.registry.stale_threshold_secs,
        probe_timeout_secs = config.registry.probe_timeout_secs,
        "beacond starting"
    );

    // Shared state
    let store = ServerStore::new();
    let registry = Registry::new(store.clone(), config.limits.clone(), &config.registry);

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Spawn tasks ──────────────────────────────────────────────────────────

    let sweep_task = tokio::spawn(sweep_loop(
        store.clone(),
        config.registry.stale_threshold(),
        shutdown_tx.subscribe(),
    ));

    let api_task = {
        let state = ApiState {
            registry,
            store,
            stale_threshold_secs: config.registry.stale_threshold_secs,
            started_at: Instant::now(),
        };
        tokio::spawn(async move {
            if let Err(e) = beacon_api::serve(state, listen).await {
                tracing::error!(error = %e, "API server failed");
            }
        })
    };

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::select! {
        _ = shutdown_rx.recv() => tracing::info!("shutting down"),
        r = sweep_task         => tracing::error!("sweep task exited: {:?}", r),
        r = api_task           => tracing::error!("API task exited: {:?}", r),
    }

    Ok(())
}
