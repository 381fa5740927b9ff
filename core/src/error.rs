//! Error types for the REST client.
//!
//! # Design
//! Failures fall into three groups. Resolution errors happen once, while the
//! client is being constructed. Programmer errors (an unsupported method
//! value, a missing body) are raised before any socket is opened and are
//! never worth retrying. Transport errors come from the per-request connect
//! and send and carry the endpoint that was being contacted.

use std::io;

use thiserror::Error;

use crate::http::HttpMethod;
use crate::resolve::Endpoint;

/// Errors returned by `RestClient` construction and request calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The host name was empty.
    #[error("invalid host name: {0:?}")]
    InvalidHost(String),

    /// The platform resolver could not resolve the host name.
    #[error("failed to resolve host {host}: {source}")]
    Dns {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The lookup succeeded but produced no candidate addresses.
    #[error("no addresses found for host {0}")]
    NoAddresses(String),

    /// Every candidate address failed the connectivity probe.
    #[error("no reachable address for {host}:{port}")]
    Unreachable { host: String, port: u16 },

    /// The caller selected no HTTP method.
    #[error("unsupported HTTP method")]
    UnsupportedMethod,

    /// The method value is outside the defined set.
    #[error("HTTP method value {0} is out of range")]
    MethodOutOfRange(i32),

    /// A POST or PUT request was built without a body.
    #[error("{0} request requires a body")]
    MissingBody(HttpMethod),

    /// Opening the request connection failed.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },

    /// Writing the request bytes failed.
    #[error("failed to send request to {endpoint}: {source}")]
    Send {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },
}

impl ClientError {
    /// True for connect and send failures of a single request.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Connect { .. } | ClientError::Send { .. })
    }

    /// True for errors caused by how the client was called rather than by
    /// the network.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            ClientError::UnsupportedMethod
                | ClientError::MethodOutOfRange(_)
                | ClientError::MissingBody(_)
        )
    }
}
