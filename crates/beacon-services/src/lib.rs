//! beacon-services — the registry core: entry store, staleness sweep,
//! reachability probe, and the registration workflow.

pub mod probe;
pub mod registration;
pub mod store;
pub mod sweep;

pub use probe::{verify, ProbeError, PROBE_CHALLENGE, PROBE_RESPONSE};
pub use registration::{Registry, RegistrationOutcome, RegistryError, RemovalOutcome};
pub use store::{ServerStore, StoreError};
pub use sweep::sweep_loop;
