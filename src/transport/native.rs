//! Socket transport: hyper HTTP/1.1 over pooled connections.

use crate::base::neterror::NetError;
use crate::transport::agent::AgentConfig;
use crate::transport::connectjob::ConnectJob;
use crate::transport::pool::{ConnectionPool, PooledSender};
use crate::transport::stream::{Chunking, ResponseHead, ResponseStream, TransportResponse};
use crate::transport::{Scheme, TransportOptions};
use bytes::Bytes;
use http::header::HOST;
use http::{HeaderValue, Request};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::sync::Arc;

/// One protocol agent over the socket transport.
///
/// Owns the keep-alive pool for its scheme; connections are parked once
/// a response body reaches end-of-stream and reused for later requests
/// to the same host and port.
pub struct NativeAgent {
    scheme: Scheme,
    config: AgentConfig,
    pool: Arc<ConnectionPool>,
}

impl NativeAgent {
    pub fn new(scheme: Scheme, config: AgentConfig) -> Self {
        Self {
            scheme,
            config,
            pool: Arc::new(ConnectionPool::new(config.max_free_sockets)),
        }
    }

    pub fn config(&self) -> AgentConfig {
        self.config
    }

    /// Parked connections currently eligible for reuse.
    pub fn idle_count(&self) -> usize {
        self.pool.idle_count()
    }

    /// Issue one request and hand back the normalized head plus a true
    /// byte stream over the response body.
    pub async fn issue(&self, opts: TransportOptions) -> Result<TransportResponse, NetError> {
        let host = opts.host.clone();
        let port = opts.effective_port();

        // A parked connection can have died since checkin; one retry on
        // a fresh socket covers that, matching keep-alive semantics.
        if let Some(sender) = self.pool.checkout(&host, port) {
            tracing::debug!(host = %host, port, "reusing parked connection");
            match self.try_send(sender, &opts).await {
                Ok(response) => return Ok(self.wrap(response, &host, port)),
                Err(_) => {
                    tracing::debug!(host = %host, port, "parked connection failed, retrying fresh");
                }
            }
        }

        let sender = self.fresh_sender(&host, port).await?;
        let response = self.try_send(sender, &opts).await?;
        Ok(self.wrap(response, &host, port))
    }

    async fn fresh_sender(&self, host: &str, port: u16) -> Result<PooledSender, NetError> {
        let socket = ConnectJob::connect(self.scheme, host, port).await?;
        let io = TokioIo::new(socket);
        let (sender, conn) = http1::handshake(io)
            .await
            .map_err(|_| NetError::ConnectionFailed)?;

        // Drive the connection until it closes.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection driver terminated");
            }
        });

        Ok(sender)
    }

    async fn try_send(
        &self,
        mut sender: PooledSender,
        opts: &TransportOptions,
    ) -> Result<(http::response::Parts, Incoming, PooledSender), NetError> {
        let req = build_request(opts)?;

        sender
            .ready()
            .await
            .map_err(|_| NetError::ConnectionClosed)?;
        let response = sender
            .send_request(req)
            .await
            .map_err(|_| NetError::ConnectionClosed)?;

        let (parts, incoming) = response.into_parts();
        Ok((parts, incoming, sender))
    }

    fn wrap(
        &self,
        (parts, incoming, sender): (http::response::Parts, Incoming, PooledSender),
        host: &str,
        port: u16,
    ) -> TransportResponse {
        let head = ResponseHead::from_parts(&parts);
        let parked = self.config.keep_alive.then(|| Parked {
            pool: Arc::clone(&self.pool),
            host: host.to_string(),
            port,
            sender,
        });
        TransportResponse { head, body: Box::new(NativeStream { incoming, parked }) }
    }
}

fn build_request(opts: &TransportOptions) -> Result<Request<Full<Bytes>>, NetError> {
    let body = Full::new(opts.body.clone().unwrap_or_default());
    let mut req = Request::builder()
        .method(opts.method.clone())
        .uri(opts.path.as_str())
        .body(body)
        .map_err(|_| NetError::InvalidHeader)?;
    *req.headers_mut() = opts.headers.clone();

    // Host header (HTTP/1.1)
    if !req.headers().contains_key(HOST) {
        let value = if opts.port.is_none() || opts.effective_port() == opts.scheme.default_port() {
            opts.host.clone()
        } else {
            format!("{}:{}", opts.host, opts.effective_port())
        };
        req.headers_mut().insert(
            HOST,
            HeaderValue::from_str(&value).map_err(|_| NetError::InvalidHeader)?,
        );
    }

    Ok(req)
}

struct Parked {
    pool: Arc<ConnectionPool>,
    host: String,
    port: u16,
    sender: PooledSender,
}

/// Streaming body off the socket transport.
///
/// Holds the connection's sender until end-of-stream, at which point it
/// is parked for reuse. A mid-stream error discards the connection.
pub struct NativeStream {
    incoming: Incoming,
    parked: Option<Parked>,
}

impl ResponseStream for NativeStream {
    fn supports_streaming(&self) -> bool {
        true
    }

    fn next_chunk(&mut self) -> Chunking<'_> {
        Box::pin(async move {
            loop {
                match self.incoming.frame().await {
                    Some(Ok(frame)) => {
                        if let Ok(data) = frame.into_data() {
                            if data.is_empty() {
                                continue;
                            }
                            return Some(Ok(data));
                        }
                        // Trailer frame; nothing to deliver.
                    }
                    Some(Err(_)) => {
                        self.parked = None;
                        return Some(Err(NetError::HttpBodyError));
                    }
                    None => {
                        if let Some(parked) = self.parked.take() {
                            parked.pool.checkin(&parked.host, parked.port, parked.sender);
                        }
                        return None;
                    }
                }
            }
        })
    }
}
