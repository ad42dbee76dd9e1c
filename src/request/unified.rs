//! The unified request/response object.
//!
//! One public surface drives either transport family: URL parsing,
//! header assembly, cookie injection, gzip negotiation, timeout
//! enforcement (socket transport only), body accumulation, and a
//! normalized completion record with timing and compression figures.

use crate::base::loadstate::LoadState;
use crate::base::neterror::NetError;
use crate::codec::BodyDecoder;
use crate::request::context::RequestContext;
use crate::transport::agent::Agent;
use crate::transport::bridge::{BridgeRequest, PlatformBridge};
use crate::transport::native::NativeAgent;
use crate::transport::selector::TransportMode;
use crate::transport::stream::TransportResponse;
use crate::transport::{Scheme, TransportOptions};
use bytes::Bytes;
use http::header::{HeaderName, ACCEPT_ENCODING, COOKIE};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Hard ceiling on one in-flight call over the socket transport. The
/// bridge transport has no cancellation primitive, so the ceiling does
/// not apply there.
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Compression negotiation is unconditionally on for this client.
const USE_GZIP_COMPRESSION: bool = true;

/// Caller-tunable knobs for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra request headers; names are treated case-insensitively.
    pub headers: Vec<(String, String)>,
    /// Request payload; only sent for methods that carry one.
    pub body: Option<Bytes>,
}

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Text(String),
    Json(Value),
}

impl ResponseBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Normalized completion record for one request.
#[derive(Debug, Clone, Serialize)]
pub struct HttpResult {
    pub status_code: u16,
    pub status_message: String,
    pub content_type: Option<String>,
    pub response_body: ResponseBody,
    /// Raw `set-cookie` values as received.
    pub cookies: Vec<String>,
    /// Decoded body length in bytes.
    pub length: usize,
    /// Percentage reduction from wire bytes to decoded bytes,
    /// rounded; 0 for an empty body.
    pub compression_ratio: i32,
    /// Wall-clock duration in milliseconds, issue to end-of-stream.
    pub duration: u64,
}

/// One HTTP request and its accumulated response.
///
/// The object owns all per-call state: the parsed URL, the outbound
/// descriptor, the byte counters, and the lifecycle position. Whatever
/// transport executes the call, `execute` resolves exactly once, with
/// either a completion record or an error, never both and never twice.
pub struct HttpRequest {
    context: Arc<RequestContext>,
    url: Url,
    scheme: Scheme,
    method: Method,
    options: RequestOptions,
    state: LoadState,
}

impl HttpRequest {
    /// `GET` convenience: construct and immediately execute.
    pub async fn get(
        context: &Arc<RequestContext>,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResult, NetError> {
        Self::new(Arc::clone(context), Method::GET, url, options)?
            .execute()
            .await
    }

    /// `POST` convenience: construct with a payload and immediately
    /// execute.
    pub async fn post(
        context: &Arc<RequestContext>,
        url: &str,
        body: impl Into<Bytes>,
        mut options: RequestOptions,
    ) -> Result<HttpResult, NetError> {
        options.body = Some(body.into());
        Self::new(Arc::clone(context), Method::POST, url, options)?
            .execute()
            .await
    }

    /// Construct without executing. `url` must be absolute.
    pub fn new(
        context: Arc<RequestContext>,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Self, NetError> {
        let url = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;
        let scheme = Scheme::from_url(&url)?;
        Ok(Self {
            context,
            url,
            scheme,
            method,
            options,
            state: LoadState::Created,
        })
    }

    /// Current lifecycle position.
    pub fn load_state(&self) -> LoadState {
        self.state
    }

    /// Run the request to completion.
    ///
    /// Never panics on malformed input and never resolves more than
    /// once; calling `execute` again on a finished object reports
    /// [`NetError::RequestAlreadyStarted`].
    pub async fn execute(&mut self) -> Result<HttpResult, NetError> {
        if self.state != LoadState::Created {
            return Err(NetError::RequestAlreadyStarted);
        }

        let agent = self.context.selector().agent_for(self.scheme).clone();
        let outcome = match agent {
            Agent::Native(agent) => {
                // Elapsing the ceiling drops the in-flight future,
                // aborting the call; it surfaces like any other
                // transport-level error.
                match tokio::time::timeout(MAX_REQUEST_TIMEOUT, self.run_native(agent)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(NetError::ConnectionTimedOut),
                }
            }
            Agent::Bridge { bridge, .. } => self.run_bridge(bridge).await,
        };

        self.state = if outcome.is_ok() {
            LoadState::Complete
        } else {
            LoadState::Failed
        };
        outcome
    }

    async fn run_native(&mut self, agent: Arc<NativeAgent>) -> Result<HttpResult, NetError> {
        let opts = self.transport_options()?;
        self.state = LoadState::InFlight;
        let started = Instant::now();
        let response = agent.issue(opts).await?;
        self.finish(response, started).await
    }

    async fn run_bridge(&mut self, bridge: Arc<dyn PlatformBridge>) -> Result<HttpResult, NetError> {
        let mut opts = self.transport_options()?;
        let body = opts.body.take();

        let mut shim = BridgeRequest::new(bridge, opts);
        if let Some(body) = &body {
            shim.write(body);
        }
        shim.set_timeout(MAX_REQUEST_TIMEOUT);

        self.state = LoadState::InFlight;
        let started = Instant::now();
        let response = shim.end().await?;
        self.finish(response, started).await
    }

    /// Consume the response stream and produce the completion record.
    async fn finish(
        &mut self,
        response: TransportResponse,
        started: Instant,
    ) -> Result<HttpResult, NetError> {
        let TransportResponse { head, mut body } = response;
        self.state = LoadState::ReceivingHeaders;

        self.context.jar().parse(&head.set_cookie);

        // Bridge replies arrive pre-decoded by the host platform; only
        // socket-transport responses go through the codec.
        let gzip = self.context.mode() == TransportMode::Native && head.is_gzip_encoded();
        let mut decoder = if gzip {
            BodyDecoder::gzip()
        } else {
            BodyDecoder::identity()
        };

        self.state = LoadState::StreamingBody;
        let mut raw_length: usize = 0;
        while let Some(chunk) = body.next_chunk().await {
            let chunk = chunk?;
            raw_length += chunk.len();
            decoder.write(&chunk)?;
        }

        // End-of-stream: both byte counts are now known.
        let elapsed = started.elapsed();
        let decoded = decoder.finish()?;
        let text = String::from_utf8_lossy(&decoded).into_owned();
        let length = text.len();

        let compression_ratio = if length == 0 {
            0
        } else {
            (100.0 - (raw_length as f64 / length as f64) * 100.0).round() as i32
        };
        let duration = (elapsed.as_secs_f64() * 1000.0).round() as u64;

        let content_type = head.content_type().map(str::to_owned);
        let response_body = if declares_json(content_type.as_deref()) {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => ResponseBody::Json(value),
                Err(_) => {
                    tracing::warn!(status = head.status, "response declared JSON but failed to parse");
                    ResponseBody::Json(serde_json::json!({ "error": "Bad JSON" }))
                }
            }
        } else {
            ResponseBody::Text(text)
        };

        Ok(HttpResult {
            status_code: head.status,
            status_message: head.status_message,
            content_type,
            response_body,
            cookies: head.set_cookie,
            length,
            compression_ratio,
            duration,
        })
    }

    /// Build the transport descriptor: target coordinates, merged
    /// headers, the jar's cookie string, and gzip negotiation.
    fn transport_options(&self) -> Result<TransportOptions, NetError> {
        let host = self
            .url
            .host_str()
            .ok_or(NetError::InvalidUrl)?
            .to_string();
        let path = match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &self.options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| NetError::InvalidHeader)?;
            let value = HeaderValue::from_str(value).map_err(|_| NetError::InvalidHeader)?;
            headers.insert(name, value);
        }

        let cookie = self.context.jar().serialize();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie).map_err(|_| NetError::InvalidHeader)?,
        );

        if USE_GZIP_COMPRESSION {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        }

        Ok(TransportOptions {
            scheme: self.scheme,
            host,
            port: self.url.port(),
            path,
            method: self.method.clone(),
            headers,
            body: self.options.body.clone(),
        })
    }
}

/// True when the declared media type is `application/json`, parameters
/// stripped, case-insensitively.
fn declares_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_declaration_ignores_parameters_and_case() {
        assert!(declares_json(Some("application/json")));
        assert!(declares_json(Some("Application/JSON; charset=utf-8")));
        assert!(!declares_json(Some("text/html")));
        assert!(!declares_json(None));
    }
}
