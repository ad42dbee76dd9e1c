//! Request context: transport selection outcome plus injected cookie jar.

use crate::cookies::{CookieJar, MemoryCookieJar};
use crate::transport::bridge::PlatformBridge;
use crate::transport::selector::{TransportMode, TransportSelector};
use std::sync::Arc;

/// Shared configuration for every request issued through it.
///
/// Construction runs transport selection exactly once; the two
/// protocol agents then live as long as the context. The cookie jar is
/// an explicit dependency so separate contexts (and separate tests)
/// never share cookie state.
pub struct RequestContext {
    selector: TransportSelector,
    jar: Arc<dyn CookieJar>,
}

impl RequestContext {
    /// Socket transport with a fresh in-memory jar.
    pub fn new() -> Self {
        Self::with_jar(Arc::new(MemoryCookieJar::new()))
    }

    /// Socket transport with a caller-supplied jar.
    pub fn with_jar(jar: Arc<dyn CookieJar>) -> Self {
        Self { selector: TransportSelector::select(None), jar }
    }

    /// Bridge transport: every call goes through the supplied host
    /// bridge primitive.
    pub fn with_bridge(bridge: Arc<dyn PlatformBridge>, jar: Arc<dyn CookieJar>) -> Self {
        Self { selector: TransportSelector::select(Some(bridge)), jar }
    }

    pub fn mode(&self) -> TransportMode {
        self.selector.mode()
    }

    pub fn jar(&self) -> &Arc<dyn CookieJar> {
        &self.jar
    }

    pub(crate) fn selector(&self) -> &TransportSelector {
        &self.selector
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
