//! Network probing.
//!
//! Port availability is tested by binding a listener and dropping it
//! straight away. The listener never accepts a connection and is released
//! before the probe returns, whatever the outcome.

use std::io;
use tokio::net::TcpListener;

/// Result of a bind attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    /// Bind succeeded; nothing else holds the port
    Free,
    /// Another socket is bound to the port
    InUse,
}

/// Try to bind `host:port` and release it immediately.
///
/// `AddrInUse` maps to [`PortState::InUse`]; every other bind error
/// (permission denied, unresolvable host) is returned to the caller.
pub async fn probe_port(host: &str, port: u16) -> io::Result<PortState> {
    match TcpListener::bind((host, port)).await {
        Ok(listener) => {
            tracing::debug!(host, port, "port bind succeeded, releasing");
            drop(listener);
            Ok(PortState::Free)
        }
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => Ok(PortState::InUse),
        Err(e) => Err(e),
    }
}
