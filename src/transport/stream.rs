//! The normalized response contract both transport families produce.

use crate::base::neterror::NetError;
use bytes::Bytes;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Alias for the `Future` type returned by [`ResponseStream::next_chunk`].
pub type Chunking<'a> = Pin<Box<dyn Future<Output = Option<Result<Bytes, NetError>>> + Send + 'a>>;

/// A finite stream of response body bytes.
///
/// This is the seam between the two transport families: the socket
/// transport yields chunks as they arrive off the wire, while the
/// bridge shim replays an already-complete body as a single chunk.
/// `next_chunk` returns `None` exactly once, at end-of-stream, and the
/// stream is not restartable after that.
pub trait ResponseStream: Send {
    /// True when the underlying transport delivers the body
    /// incrementally and can therefore be read under backpressure.
    /// False means the whole body already sits in memory.
    fn supports_streaming(&self) -> bool;

    /// Next body chunk, an error, or `None` at end-of-stream.
    fn next_chunk(&mut self) -> Chunking<'_>;
}

/// Response metadata, normalized across transports.
///
/// Header names are lower-cased into a single mapping; `set-cookie`
/// values are kept aside since they can repeat.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    pub status: u16,
    pub status_message: String,
    pub headers: HashMap<String, String>,
    pub set_cookie: Vec<String>,
}

impl ResponseHead {
    pub fn from_parts(parts: &http::response::Parts) -> Self {
        let mut headers = HashMap::new();
        let mut set_cookie = Vec::new();
        for (name, value) in parts.headers.iter() {
            let Ok(value) = value.to_str() else { continue };
            if *name == http::header::SET_COOKIE {
                set_cookie.push(value.to_string());
            } else {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        Self {
            status: parts.status.as_u16(),
            status_message: parts
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            headers,
            set_cookie,
        }
    }

    /// Header lookup by lower-cased name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_gzip_encoded(&self) -> bool {
        self.header("content-encoding")
            .is_some_and(|enc| enc.eq_ignore_ascii_case("gzip"))
    }
}

/// Head plus body stream, as handed to the request layer.
pub struct TransportResponse {
    pub head: ResponseHead,
    pub body: Box<dyn ResponseStream>,
}
