//! Loopback socket pairs for tests that need a peer on the other end of a client.

use std::io;
use std::net::{TcpListener, TcpStream};

/// Returns a connected `(client, peer)` pair on an ephemeral loopback port.
pub fn tcp_pair() -> io::Result<(TcpStream, TcpStream)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let client = TcpStream::connect(addr)?;
    let (peer, _) = listener.accept()?;
    Ok((client, peer))
}

/// Async counterpart of [`tcp_pair`].
pub async fn async_tcp_pair() -> io::Result<(tokio::net::TcpStream, tokio::net::TcpStream)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let client = tokio::net::TcpStream::connect(addr).await?;
    let (peer, _) = listener.accept().await?;
    Ok((client, peer))
}
