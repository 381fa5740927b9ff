//! HTTP request types and the wire encoder.
//!
//! # Design
//! `HttpRequest` describes a request as plain data. `encode_request` turns it
//! into the exact bytes written to the socket. Only four methods exist, so a
//! "no method" value cannot reach the encoder; it is rejected when an
//! untyped method number is converted with `HttpMethod::try_from`.
//!
//! Requests with a body always carry `Content-Type: application/json` and
//! are followed by an extra `\r\n\r\n` after the body. Existing counterpart
//! servers receive that trailer, so it is kept byte for byte.

use std::fmt;

use crate::error::ClientError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Delete,
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numbering used by C callers: 0 is "no method", then DELETE, GET, POST, PUT.
impl TryFrom<i32> for HttpMethod {
    type Error = ClientError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Err(ClientError::UnsupportedMethod),
            1 => Ok(HttpMethod::Delete),
            2 => Ok(HttpMethod::Get),
            3 => Ok(HttpMethod::Post),
            4 => Ok(HttpMethod::Put),
            other => Err(ClientError::MethodOutOfRange(other)),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RestClient::build_*` methods and serialized with
/// [`encode_request`]. The resource is expected to start with `/` and is
/// written as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub resource: String,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, resource: &str, body: Option<&str>) -> Self {
        Self {
            method,
            resource: resource.to_string(),
            body: body.map(str::to_string),
        }
    }
}

/// Serialize `request` into HTTP/1.1 bytes addressed to `host:port`.
///
/// `Content-Length` is the UTF-8 byte length of the body. A body attached
/// to a GET or DELETE request is not written.
pub fn encode_request(
    host: &str,
    port: u16,
    request: &HttpRequest,
) -> Result<Vec<u8>, ClientError> {
    let method = request.method;
    let mut wire = format!(
        "{method} {resource} HTTP/1.1\r\nHost: {host}:{port}\r\n",
        resource = request.resource
    );

    if method.has_body() {
        let body = request
            .body
            .as_deref()
            .ok_or(ClientError::MissingBody(method))?;
        wire.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}\r\n\r\n",
            body.len()
        ));
    } else {
        wire.push_str("\r\n");
    }

    Ok(wire.into_bytes())
}
