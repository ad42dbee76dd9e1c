//! Tests for the bridge transport shim and bridge-mode request flow.

use bridgenet::cookies::{CookieJar, MemoryCookieJar};
use bridgenet::request::{HttpRequest, RequestContext, RequestOptions, ResponseBody};
use bridgenet::transport::bridge::{
    BridgeCall, BridgeReply, BridgeRequest, Bridging, PlatformBridge,
};
use bridgenet::transport::stream::ResponseStream;
use bridgenet::transport::{Scheme, TransportOptions};
use bridgenet::NetError;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use std::sync::{Arc, Mutex};

/// Bridge double: records every call and resolves with a canned reply.
struct FakeBridge {
    calls: Mutex<Vec<BridgeCall>>,
    reply: Result<BridgeReply, NetError>,
}

impl FakeBridge {
    fn replying(reply: BridgeReply) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), reply: Ok(reply) })
    }

    fn failing(error: NetError) -> Arc<Self> {
        Arc::new(Self { calls: Mutex::new(Vec::new()), reply: Err(error) })
    }

    fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl PlatformBridge for FakeBridge {
    fn perform(&self, call: BridgeCall) -> Bridging {
        self.calls.lock().unwrap().push(call);
        let reply = self.reply.clone();
        Box::pin(std::future::ready(reply))
    }
}

fn reply_200(body: &str, headers: &[(&str, &str)]) -> BridgeReply {
    BridgeReply {
        status: 200,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        data: Bytes::from(body.to_string()),
    }
}

fn options(scheme: Scheme, host: &str, port: Option<u16>, path: &str, method: Method) -> TransportOptions {
    TransportOptions {
        scheme,
        host: host.to_string(),
        port,
        path: path.to_string(),
        method,
        headers: HeaderMap::new(),
        body: None,
    }
}

#[tokio::test]
async fn end_assembles_absolute_url_with_default_https_port() {
    let bridge = FakeBridge::replying(reply_200("", &[]));
    let shim = BridgeRequest::new(
        bridge.clone(),
        options(Scheme::Https, "example.com", None, "/data", Method::GET),
    );
    shim.end().await.unwrap();

    let calls = bridge.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "https://example.com:443/data");
    assert_eq!(calls[0].method, Method::GET);
}

#[tokio::test]
async fn end_keeps_an_explicit_port() {
    let bridge = FakeBridge::replying(reply_200("", &[]));
    let shim = BridgeRequest::new(
        bridge.clone(),
        options(Scheme::Http, "example.com", Some(8080), "/x", Method::GET),
    );
    shim.end().await.unwrap();

    assert_eq!(bridge.calls()[0].url, "http://example.com:8080/x");
}

#[tokio::test]
async fn explicit_content_length_is_stripped() {
    let bridge = FakeBridge::replying(reply_200("", &[]));
    let mut opts = options(Scheme::Http, "example.com", None, "/", Method::POST);
    opts.headers
        .insert("content-length", HeaderValue::from_static("3"));
    opts.headers
        .insert("x-keep-me", HeaderValue::from_static("yes"));

    let mut shim = BridgeRequest::new(bridge.clone(), opts);
    shim.write(b"x=1");
    shim.end().await.unwrap();

    let call = &bridge.calls()[0];
    assert!(call.headers.iter().all(|(name, _)| name != "content-length"));
    assert!(call
        .headers
        .iter()
        .any(|(name, value)| name == "x-keep-me" && value == "yes"));
}

#[tokio::test]
async fn buffered_payload_reaches_the_bridge_verbatim() {
    let bridge = FakeBridge::replying(reply_200("", &[]));
    let mut shim = BridgeRequest::new(
        bridge.clone(),
        options(Scheme::Http, "example.com", None, "/submit", Method::POST),
    );
    shim.write(b"x=");
    shim.write(b"1");
    shim.end().await.unwrap();

    assert_eq!(bridge.calls()[0].body, Some(Bytes::from_static(b"x=1")));
}

#[tokio::test]
async fn get_without_writes_carries_no_body() {
    let bridge = FakeBridge::replying(reply_200("", &[]));
    let shim = BridgeRequest::new(
        bridge.clone(),
        options(Scheme::Http, "example.com", None, "/", Method::GET),
    );
    shim.end().await.unwrap();

    assert_eq!(bridge.calls()[0].body, None);
}

#[tokio::test]
async fn reply_becomes_a_single_chunk_stream() {
    let bridge = FakeBridge::replying(reply_200("hello", &[("Content-Type", "text/plain")]));
    let shim = BridgeRequest::new(
        bridge,
        options(Scheme::Http, "example.com", None, "/", Method::GET),
    );
    let mut response = shim.end().await.unwrap();

    assert!(!response.body.supports_streaming());
    let first = response.body.next_chunk().await;
    assert_eq!(first, Some(Ok(Bytes::from_static(b"hello"))));
    assert!(response.body.next_chunk().await.is_none());
    // Not restartable.
    assert!(response.body.next_chunk().await.is_none());
}

#[tokio::test]
async fn reply_header_names_are_lower_cased_and_cookies_split_out() {
    let bridge = FakeBridge::replying(reply_200(
        "{}",
        &[
            ("Content-Type", "application/json"),
            ("Set-Cookie", "sid=1"),
            ("Set-Cookie", "lang=en"),
        ],
    ));
    let shim = BridgeRequest::new(
        bridge,
        options(Scheme::Http, "example.com", None, "/", Method::GET),
    );
    let response = shim.end().await.unwrap();

    assert_eq!(response.head.status, 200);
    assert_eq!(response.head.status_message, "OK");
    assert_eq!(response.head.content_type(), Some("application/json"));
    assert_eq!(response.head.set_cookie, vec!["sid=1", "lang=en"]);
}

#[tokio::test]
async fn bridge_errors_surface_verbatim() {
    let bridge = FakeBridge::failing(NetError::BridgeFailure("no route".to_string()));
    let shim = BridgeRequest::new(
        bridge,
        options(Scheme::Http, "example.com", None, "/", Method::GET),
    );
    assert_eq!(
        shim.end().await.err(),
        Some(NetError::BridgeFailure("no route".to_string()))
    );
}

// === Bridge-mode request flow ===

#[tokio::test]
async fn bridge_mode_get_decodes_json() {
    let bridge = FakeBridge::replying(reply_200(
        "{\"a\":1}",
        &[("Content-Type", "application/json"), ("Set-Cookie", "sid=xyz")],
    ));
    let jar = Arc::new(MemoryCookieJar::new());
    let context = Arc::new(RequestContext::with_bridge(bridge.clone(), jar.clone()));

    let result = HttpRequest::get(&context, "http://api.test/things", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(
        result.response_body,
        ResponseBody::Json(serde_json::json!({"a": 1}))
    );
    assert_eq!(result.cookies, vec!["sid=xyz"]);
    // The reply's cookies landed in the jar.
    assert_eq!(jar.serialize(), "sid=xyz");
    // And the call carried the jar's state at request time (empty).
    let call = &bridge.calls()[0];
    assert!(call
        .headers
        .iter()
        .any(|(name, value)| name == "cookie" && value.is_empty()));
}

#[tokio::test]
async fn bridge_replies_bypass_the_gzip_codec() {
    // The host platform hands data over pre-decoded, so an encoding tag
    // on a bridge reply must not route the body through the codec.
    let bridge = FakeBridge::replying(reply_200(
        "already plain",
        &[("Content-Type", "text/plain"), ("Content-Encoding", "gzip")],
    ));
    let context = Arc::new(RequestContext::with_bridge(
        bridge,
        Arc::new(MemoryCookieJar::new()),
    ));

    let result = HttpRequest::get(&context, "http://api.test/", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(
        result.response_body,
        ResponseBody::Text("already plain".to_string())
    );
}

#[tokio::test]
async fn bridge_mode_post_sends_the_payload() {
    let bridge = FakeBridge::replying(reply_200("", &[]));
    let context = Arc::new(RequestContext::with_bridge(
        bridge.clone(),
        Arc::new(MemoryCookieJar::new()),
    ));

    HttpRequest::post(
        &context,
        "http://api.test/submit",
        "x=1",
        RequestOptions {
            headers: vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: None,
        },
    )
    .await
    .unwrap();

    let call = &bridge.calls()[0];
    assert_eq!(call.method, Method::POST);
    assert_eq!(call.url, "http://api.test:80/submit");
    assert_eq!(call.body, Some(Bytes::from_static(b"x=1")));
    assert!(call.headers.iter().any(|(name, value)| {
        name == "content-type" && value == "application/x-www-form-urlencoded"
    }));
}

/// A bridge call cannot be aborted: the 15 s ceiling applies to the
/// socket transport only.
struct SlowBridge;

impl PlatformBridge for SlowBridge {
    fn perform(&self, _call: BridgeCall) -> Bridging {
        Box::pin(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(BridgeReply { status: 200, headers: Vec::new(), data: Bytes::new() })
        })
    }
}

#[tokio::test(start_paused = true)]
async fn bridge_calls_outlive_the_socket_timeout_ceiling() {
    let context = Arc::new(RequestContext::with_bridge(
        Arc::new(SlowBridge),
        Arc::new(MemoryCookieJar::new()),
    ));

    let result = HttpRequest::get(&context, "http://api.test/", RequestOptions::default()).await;
    assert_eq!(result.unwrap().status_code, 200);
}
