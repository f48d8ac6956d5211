//! Registration workflow — the decision path between an inbound claim and
//! a store mutation.
//!
//! Every mutating call walks the same gauntlet: parse the claimed address,
//! match it against the transport-observed source, probe on first contact,
//! validate the payload, then commit. Removal only needs identity and
//! source ownership. The probe is always fully resolved before the store is
//! touched, so a slow registrant never blocks other callers.

use std::net::IpAddr;
use std::time::Duration;

use beacon_core::config::RegistryConfig;
use beacon_core::{Limits, ServerEntry, ServerSubmission};

use crate::probe::{self, ProbeError};
use crate::store::{ServerStore, StoreError};

/// Result of a successful registration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// First registration for this identity.
    Created,
    /// Refresh of an already-known identity.
    Updated,
}

/// Result of a removal call. `NotFound` is a normal negative result, not
/// a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    MalformedAddress(String),
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
    #[error("claimed IP address does not match request source IP")]
    SourceMismatch,
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The registry service: owns the workflow policy, holds a store handle.
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct Registry {
    store: ServerStore,
    limits: Limits,
    probe_timeout: Duration,
    reprobe_on_update: bool,
}

impl Registry {
    pub fn new(store: ServerStore, limits: Limits, policy: &RegistryConfig) -> Self {
        Self {
            store,
            limits,
            probe_timeout: policy.probe_timeout(),
            reprobe_on_update: policy.reprobe_on_update,
        }
    }

    /// The underlying store, for read-only surfaces like listing and status.
    pub fn store(&self) -> &ServerStore {
        &self.store
    }

    /// Register or refresh a server.
    ///
    /// `claimed` is the raw `ip:port` request identity; `source_ip` is the
    /// address the transport actually saw the request come from.
    pub async fn register(
        &self,
        claimed: &str,
        source_ip: IpAddr,
        submission: ServerSubmission,
    ) -> Result<RegistrationOutcome, RegistryError> {
        let addr = parse_claimed(claimed)?;
        check_source(addr.ip, source_ip)?;

        let id = addr.id();
        let first_contact = !self.store.has(&id);
        if first_contact || self.reprobe_on_update {
            probe::verify(&addr, self.probe_timeout).await.map_err(|e| {
                tracing::warn!(server = %id, error = %e, "reachability probe failed");
                e
            })?;
        }

        let mut entry = ServerEntry::new(addr, submission);
        entry
            .validate(&self.limits)
            .map_err(|e| RegistryError::InvalidEntry(e.to_string()))?;

        let existed = self.store.register(entry)?;
        if existed {
            tracing::info!(server = %id, "server registration refreshed");
            Ok(RegistrationOutcome::Updated)
        } else {
            tracing::info!(server = %id, "new server registered");
            Ok(RegistrationOutcome::Created)
        }
    }

    /// Remove a server. Same source-match discipline as registration, but
    /// no probing and no payload validation — only identity and source
    /// ownership matter.
    pub fn remove(
        &self,
        claimed: &str,
        source_ip: IpAddr,
    ) -> Result<RemovalOutcome, RegistryError> {
        let addr = parse_claimed(claimed)?;
        check_source(addr.ip, source_ip)?;

        let id = addr.id();
        if self.store.remove(&id) {
            tracing::info!(server = %id, "server removed");
            Ok(RemovalOutcome::Removed)
        } else {
            tracing::info!(server = %id, "removal for unknown server");
            Ok(RemovalOutcome::NotFound)
        }
    }
}

fn parse_claimed(raw: &str) -> Result<beacon_core::ServerAddr, RegistryError> {
    raw.parse()
        .map_err(|e: beacon_core::AddrError| RegistryError::MalformedAddress(e.to_string()))
}

/// A server may only speak for the host it is calling from.
fn check_source(claimed: IpAddr, observed: IpAddr) -> Result<(), RegistryError> {
    // Observed addresses can arrive IPv4-mapped on dual-stack listeners.
    if claimed == observed.to_canonical() {
        return Ok(());
    }
    tracing::warn!(
        claimed = %claimed,
        observed = %observed,
        "claimed IP does not match request source — possible spoofing"
    );
    Err(RegistryError::SourceMismatch)
}
