//! # bridgenet
//!
//! A transport-agnostic HTTP client library for Rust.
//!
//! `bridgenet` presents one uniform request/response object regardless
//! of which network stack executes the call: a socket transport with
//! true streaming (DNS → TCP → TLS → HTTP/1.1 over `hyper`), or a
//! host-provided bridge primitive that delivers whole responses
//! atomically. Both are re-normalized into a single streaming contract
//! with timing, compression-transparency, and cookie-persistence
//! semantics layered on top.
//!
//! ## Features
//!
//! - **One surface, two transports**: `get`/`post` convenience calls or
//!   the constructor/`execute` pair, dispatched by a one-shot selector
//! - **Keep-Alive**: bounded idle pool (8 free connections per scheme)
//!   on the socket transport; the bridge manages its own reuse
//! - **Gzip transparency**: `accept-encoding: gzip` negotiated on every
//!   call, decoding inserted into the pipeline when the wire says so
//! - **Cookie persistence**: an injected jar, read on the way out and
//!   updated from every `set-cookie` on the way back
//! - **Per-call stats**: wall-clock duration and compression ratio in
//!   every completion record
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bridgenet::request::{HttpRequest, RequestContext, RequestOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let context = Arc::new(RequestContext::new());
//!     let result = HttpRequest::get(&context, "https://example.com/api", RequestOptions::default())
//!         .await
//!         .unwrap();
//!     println!("{} in {} ms", result.status_code, result.duration);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error taxonomy and request lifecycle states
//! - [`codec`] - Gzip decoding between the wire and the accumulation buffer
//! - [`cookies`] - The jar contract and the bundled in-memory jar
//! - [`request`] - Request context and the unified request/response object
//! - [`transport`] - Transport selection, the socket family, the bridge shim
//!
//! ## Security
//!
//! **TLS peer certificate verification is disabled.** The socket
//! transport accepts any certificate chain; certificate errors are
//! suppressed rather than raised. This matches environments where the
//! host platform terminates trust decisions elsewhere, but it is unsafe
//! for general-purpose traffic: do not point this client at endpoints
//! whose identity you have no other way to establish.
//!
//! A second asymmetry worth knowing about: the 15-second request
//! ceiling is enforced on the socket transport only. The bridge
//! primitive has no cancellation mechanism, so a bridge call that
//! stalls cannot be aborted by this layer.

pub mod base;
pub mod codec;
pub mod cookies;
pub mod request;
pub mod transport;

pub use base::loadstate::LoadState;
pub use base::neterror::NetError;
pub use cookies::{CookieJar, MemoryCookieJar};
pub use request::{HttpRequest, HttpResult, RequestContext, RequestOptions, ResponseBody};
pub use transport::bridge::{BridgeCall, BridgeReply, Bridging, PlatformBridge};
pub use transport::selector::TransportMode;
