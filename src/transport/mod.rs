//! Transport selection and the two transport families.
//!
//! Two incompatible delivery models live behind one surface:
//! - [`native`]: the socket transport (DNS → TCP → TLS → HTTP/1.1)
//!   with true incremental body streaming and keep-alive reuse;
//! - [`bridge`]: a shim over a host-provided atomic HTTP primitive
//!   that delivers whole responses in one callback.
//!
//! [`selector`] decides once per context which family is active and
//! builds the two protocol agents; [`stream`] defines the polymorphic
//! response-stream contract both families normalize into.

pub mod agent;
pub mod bridge;
pub mod connectjob;
pub mod native;
pub mod pool;
pub mod selector;
pub mod stream;

use crate::base::neterror::NetError;
use bytes::Bytes;
use http::{HeaderMap, Method};
use url::Url;

/// Protocol scheme this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn from_url(url: &Url) -> Result<Self, NetError> {
        match url.scheme() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(NetError::UnsupportedScheme),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request descriptor handed to whichever transport family is active.
///
/// Immutable once the transport call is issued.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub scheme: Scheme,
    pub host: String,
    /// Explicit port from the URL; `None` falls back to the scheme default.
    pub port: Option<u16>,
    /// Path plus query string, origin-form.
    pub path: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl TransportOptions {
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }
}
