use std::time::Duration;

use tokio::net::TcpStream;

/// Whether something accepts TCP connections on `127.0.0.1:port`.
pub async fn is_port_open(port: u16, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(("127.0.0.1", port))).await,
        Ok(Ok(_))
    )
}
