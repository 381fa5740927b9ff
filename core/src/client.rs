//! Blocking REST client bound to one resolved endpoint.
//!
//! # Design
//! `RestClient` resolves its endpoint once, during construction, and never
//! changes it afterwards. Each request call builds an `HttpRequest`,
//! encodes it with the host name the caller supplied and sends it over a
//! fresh connection. The client holds no mutable state, so a constructed
//! client can be shared across threads when its connector allows it.
//!
//! Request operations are split into `build_*` (plain data) and `send`, so
//! the exact bytes can be inspected with `encode` without touching the
//! network.

use std::time::Duration;

use tracing::debug;

use crate::error::ClientError;
use crate::http::{encode_request, HttpMethod, HttpRequest};
use crate::resolve::{resolve, DnsResolver, Endpoint, SystemResolver};
use crate::transport::{send_request, Connector, TcpConnector};

/// Tunables applied while constructing a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long the probe waits for a candidate connection to become
    /// writable.
    pub probe_window: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            probe_window: Duration::from_micros(10),
        }
    }
}

/// Fire-and-forget client for a REST API reachable over plain TCP.
#[derive(Debug, Clone)]
pub struct RestClient<C: Connector = TcpConnector> {
    host: String,
    endpoint: Endpoint,
    connector: C,
}

impl RestClient {
    /// Resolve `host` with the platform resolver and default settings.
    pub fn new(host: &str, port: u16) -> Result<Self, ClientError> {
        Self::with_config(host, port, &ClientConfig::default())
    }

    pub fn with_config(host: &str, port: u16, config: &ClientConfig) -> Result<Self, ClientError> {
        Self::connect_with(host, port, &SystemResolver, TcpConnector, config)
    }
}

impl<C: Connector> RestClient<C> {
    /// Resolve `host` through `resolver`, probing candidates with
    /// `connector`, and keep `connector` for the requests that follow.
    pub fn connect_with<R: DnsResolver + ?Sized>(
        host: &str,
        port: u16,
        resolver: &R,
        connector: C,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let endpoint = resolve(host, port, resolver, &connector, config.probe_window)?;
        Ok(Self::from_endpoint(host, endpoint, connector))
    }

    /// Build a client for an endpoint that is already known. No probe is
    /// made.
    pub fn from_endpoint(host: &str, endpoint: Endpoint, connector: C) -> Self {
        Self {
            host: host.to_string(),
            endpoint,
            connector,
        }
    }

    /// The host name echoed in every `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn build_get(&self, resource: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, resource, None)
    }

    pub fn build_delete(&self, resource: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, resource, None)
    }

    pub fn build_post(&self, resource: &str, body: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, resource, Some(body))
    }

    pub fn build_put(&self, resource: &str, body: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Put, resource, Some(body))
    }

    /// Wire bytes for `request` as this client would send them.
    pub fn encode(&self, request: &HttpRequest) -> Result<Vec<u8>, ClientError> {
        encode_request(&self.host, self.endpoint.port, request)
    }

    /// Encode `request` and write it to the endpoint over a new connection.
    ///
    /// Programmer errors surface before any connection is opened.
    pub fn send(&self, request: &HttpRequest) -> Result<(), ClientError> {
        let bytes = self.encode(request)?;
        debug!(
            method = %request.method,
            resource = %request.resource,
            endpoint = %self.endpoint,
            "sending request"
        );
        send_request(&self.connector, self.endpoint, &bytes)
    }

    pub fn get(&self, resource: &str) -> Result<(), ClientError> {
        self.send(&self.build_get(resource))
    }

    pub fn delete(&self, resource: &str) -> Result<(), ClientError> {
        self.send(&self.build_delete(resource))
    }

    pub fn post(&self, resource: &str, body: &str) -> Result<(), ClientError> {
        self.send(&self.build_post(resource, body))
    }

    pub fn put(&self, resource: &str, body: &str) -> Result<(), ClientError> {
        self.send(&self.build_put(resource, body))
    }
}
