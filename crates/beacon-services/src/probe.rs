//! Reachability probe — UDP challenge/response dial-back.
//!
//! Before a first-time registration is trusted, the registry dials back to
//! the claimed address and expects the game server to answer. The exchange
//! is a fixed 4-byte challenge (`"ping"`) answered by `"pong"`. The
//! challenge is sent several times in quick succession to ride out datagram
//! loss; there is no retransmission loop — one bounded wait decides the
//! attempt.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use beacon_core::ServerAddr;

/// Challenge payload sent to the claimed address.
pub const PROBE_CHALLENGE: &[u8; 4] = b"ping";
/// Expected first four bytes of the acknowledgement.
pub const PROBE_RESPONSE: &[u8; 4] = b"pong";

/// Duplicate challenge datagrams per probe. Only one needs to arrive.
const PROBE_SENDS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("could not probe server: {0}")]
    Unreachable(String),
    #[error("no probe response within {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("bad probe response")]
    Rejected,
}

/// Confirm that a listener exists at `addr` by exchanging ping/pong.
///
/// Opens a fresh unconnected socket per call, fires the redundant
/// challenges, then waits up to `wait` for any inbound datagram. Always
/// returns once the timeout elapses. Any unexpected socket failure maps to
/// `Unreachable`.
pub async fn verify(addr: &ServerAddr, wait: Duration) -> Result<(), ProbeError> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| ProbeError::Unreachable(e.to_string()))?;

    let target = SocketAddr::new(addr.ip, addr.port);
    for _ in 0..PROBE_SENDS {
        socket
            .send_to(PROBE_CHALLENGE, target)
            .await
            .map_err(|e| ProbeError::Unreachable(e.to_string()))?;
    }
    tracing::debug!(server = %addr, sends = PROBE_SENDS, "probe challenges sent");

    let mut buf = [0u8; 8];
    let (len, from) = timeout(wait, socket.recv_from(&mut buf))
        .await
        .map_err(|_| ProbeError::Timeout(wait))?
        .map_err(|e| ProbeError::Unreachable(e.to_string()))?;

    if len >= PROBE_RESPONSE.len() && &buf[..PROBE_RESPONSE.len()] == PROBE_RESPONSE {
        tracing::debug!(server = %addr, responder = %from, "probe acknowledged");
        Ok(())
    } else {
        tracing::debug!(server = %addr, len, "probe response did not match");
        Err(ProbeError::Rejected)
    }
}
