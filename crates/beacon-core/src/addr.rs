//! Server address codec — the registry's identity primitive.
//!
//! A registration is keyed by the canonical `ip:port` string of the address
//! it claims. Parsing and policy are separable: `FromStr` only decides
//! whether the text is an address at all, `validate` decides whether the
//! address is acceptable under the configured limits.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::config::Limits;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddrError {
    #[error("malformed server address: {0:?}")]
    Malformed(String),
    #[error("IP is not a valid IPv4 host address")]
    InvalidIp,
    #[error("port is not within the valid port range of {min}-{max}")]
    PortOutOfRange { min: u16, max: u16 },
}

/// A claimed server address: host IP plus advertised game port.
///
/// The IP is held as `IpAddr` so that a syntactically valid IPv6 literal
/// still parses — `validate` is what rejects anything that is not an IPv4
/// host. Ports above 65535 never parse, so only the lower bound is a
/// policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ServerAddr {
    pub ip: IpAddr,
    pub port: u16,
}

impl ServerAddr {
    /// The registry identity for this address.
    pub fn id(&self) -> ServerId {
        ServerId(self.to_string())
    }

    /// Check the address against the configured limits.
    pub fn validate(&self, limits: &Limits) -> Result<(), AddrError> {
        if !self.ip.is_ipv4() {
            return Err(AddrError::InvalidIp);
        }
        if self.port < limits.port_min || self.port > limits.port_max {
            return Err(AddrError::PortOutOfRange {
                min: limits.port_min,
                max: limits.port_max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

impl FromStr for ServerAddr {
    type Err = AddrError;

    /// Parse `ip:port`. Fails only on malformed input — range checks and
    /// the IPv4 requirement belong to `validate`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (host, port) = raw
            .rsplit_once(':')
            .ok_or_else(|| AddrError::Malformed(raw.to_string()))?;

        // Accept the bracketed IPv6 form so it can be rejected by
        // validation rather than read as garbage.
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        let ip: IpAddr = host
            .parse()
            .map_err(|_| AddrError::Malformed(raw.to_string()))?;
        let port: u16 = port
            .parse()
            .map_err(|_| AddrError::Malformed(raw.to_string()))?;

        Ok(Self { ip, port })
    }
}

/// The canonical `ip:port` string identifying a registered server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerId(String);

impl ServerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
