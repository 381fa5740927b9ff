//! Raw request recorder.
//!
//! Accepts connections and reads each one to end of stream. Every non-empty
//! capture is forwarded on the channel as one `Vec<u8>`. Connections that
//! close without sending anything (reachability probes) are dropped.

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedSender;

/// Accept connections on `listener` until the receiving side of `tx` goes
/// away.
pub async fn record(listener: TcpListener, tx: UnboundedSender<Vec<u8>>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        if tx.is_closed() {
            return Ok(());
        }
        tracing::debug!(%peer, "connection accepted");
        let tx = tx.clone();
        tokio::spawn(async move {
            match read_all(stream).await {
                Ok(bytes) if bytes.is_empty() => tracing::debug!(%peer, "empty connection"),
                Ok(bytes) => {
                    tracing::debug!(%peer, len = bytes.len(), "request captured");
                    let _ = tx.send(bytes);
                }
                Err(err) => tracing::warn!(%peer, error = %err, "capture failed"),
            }
        });
    }
}

async fn read_all(mut stream: TcpStream) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).await?;
    Ok(bytes)
}
