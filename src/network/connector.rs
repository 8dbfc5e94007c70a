//! Transport establishment.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

/// A bidirectional byte stream to the server.
pub trait Transport: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Transport for T {}

pub type BoxedTransport = Box<dyn Transport>;

/// Opens transports to `host:port` addresses.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, addr: &str) -> std::io::Result<BoxedTransport>;
}

/// Plain TCP.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, addr: &str) -> std::io::Result<BoxedTransport> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        debug!(addr = %addr, local = ?stream.local_addr().ok(), "tcp connected");
        Ok(Box::new(stream))
    }
}
