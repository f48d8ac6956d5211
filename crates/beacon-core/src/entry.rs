//! Registry entries — the data model for a registered game server.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::addr::{AddrError, ServerAddr, ServerId};
use crate::config::Limits;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error(transparent)]
    Addr(#[from] AddrError),
    #[error("name length must be within range of {min}-{max}")]
    NameLength { min: usize, max: usize },
}

/// A registered game server.
///
/// The address doubles as the entry's identity; everything else is mutable
/// state replaced wholesale on re-registration. The store owns all entries —
/// callers only ever see clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntry {
    #[serde(flatten)]
    pub addr: ServerAddr,

    pub name: String,
    pub game_version: u32,
    pub is_joinable: bool,

    /// Last time this server registered or refreshed itself.
    #[serde(with = "unix_secs")]
    pub last_seen: SystemTime,
}

impl ServerEntry {
    /// Build an entry from a claimed address and the submitted fields,
    /// with `last_seen` set to now.
    pub fn new(addr: ServerAddr, submission: ServerSubmission) -> Self {
        Self {
            addr,
            name: submission.name,
            game_version: submission.game_version,
            is_joinable: submission.is_joinable,
            last_seen: SystemTime::now(),
        }
    }

    /// The registry identity for this entry.
    pub fn id(&self) -> ServerId {
        self.addr.id()
    }

    /// Mark the server as seen, refreshing `last_seen`.
    pub fn touch(&mut self) {
        self.last_seen = SystemTime::now();
    }

    /// Validate the entry against the configured limits.
    ///
    /// Trims the name in place before length-checking it, so a committed
    /// entry never carries leading or trailing whitespace. Length is
    /// measured in bytes.
    pub fn validate(&mut self, limits: &Limits) -> Result<(), EntryError> {
        self.addr.validate(limits)?;

        self.name = self.name.trim().to_string();
        if self.name.len() < limits.name_min || self.name.len() > limits.name_max {
            return Err(EntryError::NameLength {
                min: limits.name_min,
                max: limits.name_max,
            });
        }

        Ok(())
    }
}

/// The fields a registrant supplies in a registration body.
///
/// The claimed address is not part of the submission — it arrives separately
/// as the request identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSubmission {
    pub name: String,
    #[serde(default)]
    pub game_version: u32,
    #[serde(default)]
    pub is_joinable: bool,
}

mod unix_secs {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
        let secs = t
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        s.serialize_u64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SystemTime, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}
