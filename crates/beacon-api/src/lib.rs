//! beacon-api — HTTP boundary for the registry.
//!
//! Thin by design: handlers decode requests, hand the registry core the
//! observed source address, and translate outcomes to statuses. No registry
//! semantics live here.

pub mod handlers;

use std::net::SocketAddr;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/servers", get(handlers::handle_list))
        .route("/servers/{server_id}", post(handlers::handle_register))
        .route("/servers/{server_id}", delete(handlers::handle_remove))
        .route("/getip", get(handlers::handle_getip))
        .route("/status", get(handlers::handle_status))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

pub async fn serve(state: ApiState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Serve on an already-bound listener. Split out so tests can bind port 0
/// and learn the address first.
pub async fn serve_on(listener: tokio::net::TcpListener, state: ApiState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "API listening");

    // ConnectInfo carries the transport-observed peer address into handlers,
    // which the registration workflow needs for source matching.
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
