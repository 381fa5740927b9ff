//! Socket plumbing: opening connections, the writability probe, and sending
//! one request per connection.
//!
//! # Design
//! Every request opens its own TCP connection, writes the whole request and
//! drops the stream. There is no pooling and no response read. Streams are
//! owned values, so dropping them closes the socket on every exit path,
//! including early returns through `?`.
//!
//! `Connector` is the seam between the client and the operating system so
//! resolution and sending can be driven by a scripted connector in tests.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::thread;
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, trace};

use crate::error::ClientError;
use crate::resolve::Endpoint;

/// Opens streams and checks that a freshly opened stream can be written to.
pub trait Connector {
    /// Stream type produced by `connect`. Dropping it closes the connection.
    type Stream: Write;

    /// Open a connection to `addr`, blocking until the connect completes or
    /// fails.
    fn connect(&self, addr: SocketAddr) -> io::Result<Self::Stream>;

    /// Report whether `stream` is ready for writing, waiting at most
    /// `window`.
    fn poll_writable(&self, stream: &Self::Stream, window: Duration) -> io::Result<bool>;
}

/// Plain TCP connector backed by `socket2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Stream = Socket;

    fn connect(&self, addr: SocketAddr) -> io::Result<Socket> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.connect(&SockAddr::from(addr))?;
        Ok(socket)
    }

    fn poll_writable(&self, socket: &Socket, window: Duration) -> io::Result<bool> {
        if let Some(err) = socket.take_error()? {
            return Err(err);
        }

        // A zero-length send on a non-blocking socket succeeds only once the
        // connection is established and the send buffer has room.
        socket.set_nonblocking(true)?;
        let deadline = Instant::now() + window;
        loop {
            match socket.send(&[]) {
                Ok(_) => return Ok(true),
                Err(err)
                    if matches!(
                        err.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) =>
                {
                    if Instant::now() >= deadline {
                        return Ok(false);
                    }
                    thread::yield_now();
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Connect to `addr`, poll for writability and close the probe connection.
///
/// Failures are reported as `false`; the caller moves on to the next
/// candidate.
pub(crate) fn probe<C: Connector>(connector: &C, addr: SocketAddr, window: Duration) -> bool {
    let stream = match connector.connect(addr) {
        Ok(stream) => stream,
        Err(err) => {
            debug!(%addr, error = %err, "probe connect failed");
            return false;
        }
    };

    let ready = match connector.poll_writable(&stream, window) {
        Ok(ready) => ready,
        Err(err) => {
            debug!(%addr, error = %err, "probe poll failed");
            false
        }
    };
    drop(stream);

    debug!(%addr, ready, "probe finished");
    ready
}

/// Deliver `bytes` to `endpoint` over a new connection.
///
/// The full buffer is written before the stream is dropped. Nothing is read
/// back.
pub fn send_request<C: Connector>(
    connector: &C,
    endpoint: Endpoint,
    bytes: &[u8],
) -> Result<(), ClientError> {
    let mut stream = connector
        .connect(endpoint.socket_addr())
        .map_err(|source| ClientError::Connect { endpoint, source })?;

    stream
        .write_all(bytes)
        .and_then(|()| stream.flush())
        .map_err(|source| ClientError::Send { endpoint, source })?;

    trace!(%endpoint, len = bytes.len(), "request written");
    Ok(())
}
