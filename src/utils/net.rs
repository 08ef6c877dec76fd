use tokio::net::TcpStream;

/// `true` once something accepts TCP connections on `addr` (`host:port`).
pub(crate) async fn is_server_ready(addr: &str) -> bool {
    TcpStream::connect(addr).await.is_ok()
}
