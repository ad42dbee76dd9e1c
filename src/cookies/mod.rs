//! Cookie persistence.
//!
//! The request layer treats the jar as an opaque service: it reads one
//! serialized header string per outbound request and writes raw
//! `set-cookie` values back per response. [`CookieJar`](jar::CookieJar)
//! is that contract; [`MemoryCookieJar`](jar::MemoryCookieJar) is the
//! bundled in-memory implementation.
//!
//! The jar is always an injected dependency of a
//! [`RequestContext`](crate::request::context::RequestContext), never a
//! process-wide singleton, so tests can isolate cookie state per
//! context.

pub mod jar;

pub use jar::{CookieJar, MemoryCookieJar};
