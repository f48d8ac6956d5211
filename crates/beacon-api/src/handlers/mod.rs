//! HTTP API handlers — exposes registry state and operations as JSON.

pub mod servers;
pub mod status;

use std::time::Instant;

use beacon_services::{Registry, ServerStore};

#[derive(Clone)]
pub struct ApiState {
    pub registry: Registry,
    pub store: ServerStore,
    /// Staleness threshold in effect, echoed on the status surface.
    pub stale_threshold_secs: u64,
    pub started_at: Instant,
}

// Re-export handler functions for use in router setup.
pub use servers::{handle_list, handle_register, handle_remove};
pub use status::{handle_getip, handle_status};
