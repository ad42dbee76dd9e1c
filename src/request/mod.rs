//! High-level request API.
//!
//! [`RequestContext`](context::RequestContext) bundles the transport
//! selection outcome with an injected cookie jar;
//! [`HttpRequest`](unified::HttpRequest) is the unified
//! request/response object driven over whichever transport the context
//! selected.

pub mod context;
pub mod unified;

pub use context::RequestContext;
pub use unified::{HttpRequest, HttpResult, RequestOptions, ResponseBody, MAX_REQUEST_TIMEOUT};
