//! Bridge transport shim.
//!
//! Some host environments expose no socket access, only an atomic HTTP
//! primitive: hand it a whole request, get a whole response back in one
//! callback. [`BridgeRequest`] adapts that primitive to the streaming
//! request shape the unified object drives, and the reply is replayed
//! through a one-shot, single-chunk [`ResponseStream`].

use crate::base::neterror::NetError;
use crate::transport::stream::{Chunking, ResponseHead, ResponseStream, TransportResponse};
use crate::transport::TransportOptions;
use bytes::{Bytes, BytesMut};
use http::header::CONTENT_LENGTH;
use http::{Method, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// One outbound call handed to the platform bridge.
#[derive(Debug, Clone)]
pub struct BridgeCall {
    pub method: Method,
    /// Absolute URL, port always explicit.
    pub url: String,
    /// Header name/value pairs, names lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

/// Structured reply delivered by the platform bridge.
///
/// The body arrives complete and pre-decoded; the bridge applies its
/// own content decoding before handing data over.
#[derive(Debug, Clone)]
pub struct BridgeReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub data: Bytes,
}

/// Alias for the `Future` type returned by [`PlatformBridge::perform`].
pub type Bridging = Pin<Box<dyn Future<Output = Result<BridgeReply, NetError>> + Send>>;

/// The host-provided atomic HTTP primitive.
///
/// Implementations run the whole exchange and resolve once, with either
/// a structured reply or an error payload. There is no incremental
/// delivery and no way to abort a call once started.
pub trait PlatformBridge: Send + Sync {
    fn perform(&self, call: BridgeCall) -> Bridging;
}

/// Blanket implementation for Arc-wrapped bridges.
impl<B: PlatformBridge + ?Sized> PlatformBridge for Arc<B> {
    fn perform(&self, call: BridgeCall) -> Bridging {
        (**self).perform(call)
    }
}

/// Streaming-request facade over the atomic bridge primitive.
///
/// `write` buffers the outgoing payload and `end` performs the whole
/// exchange, mirroring the write/end lifecycle of the socket transport.
pub struct BridgeRequest {
    bridge: Arc<dyn PlatformBridge>,
    options: TransportOptions,
    buffered: BytesMut,
}

impl BridgeRequest {
    pub fn new(bridge: Arc<dyn PlatformBridge>, options: TransportOptions) -> Self {
        Self { bridge, options, buffered: BytesMut::new() }
    }

    /// Buffer outgoing payload bytes. Only meaningful for methods that
    /// carry a body.
    pub fn write(&mut self, data: &[u8]) {
        self.buffered.extend_from_slice(data);
    }

    /// Accepted and ignored: the bridge exposes no timeout primitive,
    /// so a call issued through it cannot be aborted by this layer.
    pub fn set_timeout(&mut self, _ceiling: Duration) {}

    /// Assemble the absolute URL and run the exchange.
    pub async fn end(self) -> Result<TransportResponse, NetError> {
        let port = self.options.effective_port();
        let url = format!(
            "{}://{}:{}{}",
            self.options.scheme,
            self.options.host,
            port,
            self.options.path
        );

        // The bridge computes its own content-length.
        let headers = self
            .options
            .headers
            .iter()
            .filter(|(name, _)| **name != CONTENT_LENGTH)
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = (!self.buffered.is_empty()).then(|| self.buffered.freeze());

        let call = BridgeCall { method: self.options.method.clone(), url, headers, body };
        tracing::debug!(url = %call.url, method = %call.method, "dispatching through platform bridge");

        let reply = self.bridge.perform(call).await?;
        Ok(normalize(reply))
    }
}

/// Normalize a raw bridge reply: lower-case header names into one
/// mapping, split out `set-cookie`, derive the status message from the
/// status code.
fn normalize(reply: BridgeReply) -> TransportResponse {
    let mut head = ResponseHead {
        status: reply.status,
        status_message: StatusCode::from_u16(reply.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or_default()
            .to_string(),
        ..Default::default()
    };

    for (name, value) in reply.headers {
        let name = name.to_ascii_lowercase();
        if name == "set-cookie" {
            head.set_cookie.push(value);
        } else {
            head.headers.insert(name, value);
        }
    }

    TransportResponse { head, body: Box::new(BridgeStream::new(reply.data)) }
}

/// One-shot in-memory pipe over an already-complete body.
///
/// Simulates a finite byte stream: the whole body as one chunk, then
/// end-of-stream. Not restartable.
pub struct BridgeStream {
    data: Option<Bytes>,
}

impl BridgeStream {
    pub fn new(data: Bytes) -> Self {
        Self { data: Some(data) }
    }
}

impl ResponseStream for BridgeStream {
    fn supports_streaming(&self) -> bool {
        false
    }

    fn next_chunk(&mut self) -> Chunking<'_> {
        let chunk = self.data.take();
        Box::pin(std::future::ready(chunk.map(Ok)))
    }
}
