//! Connection establishment: DNS → TCP → TLS.

use crate::base::neterror::NetError;
use crate::transport::Scheme;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// A connected socket, plain or TLS.
#[derive(Debug)]
pub enum SocketType {
    Tcp(TcpStream),
    Ssl(tokio_boring::SslStream<TcpStream>),
}

impl AsyncRead for SocketType {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            SocketType::Ssl(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for SocketType {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            SocketType::Ssl(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_flush(cx),
            SocketType::Ssl(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocketType::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            SocketType::Ssl(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// Manages the connection process for one request.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(scheme: Scheme, host: &str, port: u16) -> Result<SocketType, NetError> {
        // 1. DNS Resolution
        let addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|_| NetError::NameNotResolved)?;

        // 2. TCP Connect
        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(NetError::from(e)),
            }
        }
        let stream = match stream {
            Some(s) => s,
            None => return Err(last_err.unwrap_or(NetError::ConnectionFailed)),
        };

        // 3. TLS Handshake (https only)
        if scheme == Scheme::Https {
            let mut builder = SslConnector::builder(SslMethod::tls())
                .map_err(|_| NetError::SslProtocolError)?;

            // HTTP/1.1 only; no h2 offer.
            let protos = b"\x08http/1.1";
            builder
                .set_alpn_protos(protos)
                .map_err(|_| NetError::SslProtocolError)?;

            // Peer certificate verification is intentionally OFF at this
            // layer. Certificate errors are suppressed rather than raised;
            // see the security note in the crate docs before putting this
            // in front of real traffic.
            builder.set_verify(SslVerifyMode::NONE);

            let connector = builder.build();
            let config = connector
                .configure()
                .map_err(|_| NetError::SslProtocolError)?;

            let tls_stream = tokio_boring::connect(config, host, stream)
                .await
                .map_err(|e| {
                    tracing::debug!(host = %host, error = ?e, "TLS handshake failed");
                    NetError::SslProtocolError
                })?;

            Ok(SocketType::Ssl(tls_stream))
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }
}
