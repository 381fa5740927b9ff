//! Minimal blocking REST client for constrained devices.
//!
//! # Overview
//! Sends HTTP/1.1 requests to a REST API over raw TCP sockets without a
//! platform HTTP stack. The host is resolved once, when the client is
//! constructed, and every request goes out over its own short-lived
//! connection. Responses are never read.
//!
//! # Design
//! - `resolve` probes each candidate address and commits to the first one
//!   that accepts a connection.
//! - `http` holds the request data types and the byte-exact wire encoder.
//! - `transport` owns the sockets: the probe, and one connection per send.
//! - `RestClient` ties them together and exposes `get`, `post`, `put` and
//!   `delete`.
//! - Bodies are passed in already serialized; the client does no JSON work.

pub mod client;
pub mod error;
pub mod http;
pub mod resolve;
pub mod transport;

pub use client::{ClientConfig, RestClient};
pub use error::ClientError;
pub use http::{encode_request, HttpMethod, HttpRequest};
pub use resolve::{resolve, DnsResolver, Endpoint, StaticResolver, SystemResolver};
pub use transport::{send_request, Connector, TcpConnector};
