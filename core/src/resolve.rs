//! Host name resolution and endpoint selection.
//!
//! # Design
//! A host name may resolve to several addresses. Each candidate is probed
//! in lookup order with a short-lived connection and the first one that
//! connects and reports writable becomes the client's `Endpoint`. Probe
//! failures are logged and skipped. If no candidate passes, resolution
//! fails with `ClientError::Unreachable` instead of handing back an unusable
//! endpoint.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ClientError;
use crate::transport::{self, Connector};

/// The single network destination for every request of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub ip: IpAddr,
    pub port: u16,
}

impl Endpoint {
    pub fn new(ip: IpAddr, port: u16) -> Self {
        Self { ip, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.socket_addr(), f)
    }
}

/// Turns a host name and port into candidate socket addresses.
pub trait DnsResolver {
    /// Look up `host`, returning candidates in preference order.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidHost` for an empty host and
    /// `ClientError::Dns` when the lookup itself fails.
    fn lookup(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>, ClientError>;
}

/// Resolver backed by the platform's name service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl DnsResolver for SystemResolver {
    fn lookup(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>, ClientError> {
        if host.is_empty() {
            return Err(ClientError::InvalidHost(host.to_string()));
        }

        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|source| ClientError::Dns {
                host: host.to_string(),
                source,
            })?
            .collect();
        Ok(addrs)
    }
}

/// Resolver returning a fixed candidate list regardless of host.
///
/// Useful when the device has no name service or when the addresses are
/// known up front.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    candidates: Vec<SocketAddr>,
}

impl StaticResolver {
    pub fn new(candidates: Vec<SocketAddr>) -> Self {
        Self { candidates }
    }
}

impl DnsResolver for StaticResolver {
    fn lookup(&self, host: &str, _port: u16) -> Result<Vec<SocketAddr>, ClientError> {
        if host.is_empty() {
            return Err(ClientError::InvalidHost(host.to_string()));
        }
        Ok(self.candidates.clone())
    }
}

/// Resolve `host` and commit to the first candidate that passes the probe.
///
/// Unspecified addresses (`0.0.0.0`, `::`) are skipped without probing. Each
/// probe connection is closed before the next candidate is tried.
pub fn resolve<R, C>(
    host: &str,
    port: u16,
    resolver: &R,
    connector: &C,
    probe_window: Duration,
) -> Result<Endpoint, ClientError>
where
    R: DnsResolver + ?Sized,
    C: Connector,
{
    let candidates = resolver.lookup(host, port)?;
    if candidates.is_empty() {
        return Err(ClientError::NoAddresses(host.to_string()));
    }

    for candidate in candidates {
        if candidate.ip().is_unspecified() {
            debug!(%candidate, "skipping unspecified address");
            continue;
        }

        // Candidates carry the lookup port; the caller's port is authoritative.
        let addr = SocketAddr::new(candidate.ip(), port);
        if transport::probe(connector, addr, probe_window) {
            let endpoint = Endpoint::from(addr);
            debug!(host, %endpoint, "endpoint resolved");
            return Ok(endpoint);
        }
    }

    warn!(host, port, "no candidate address accepted a connection");
    Err(ClientError::Unreachable {
        host: host.to_string(),
        port,
    })
}
