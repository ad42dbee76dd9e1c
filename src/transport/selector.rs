//! One-shot transport family selection.

use crate::transport::agent::{Agent, AgentConfig};
use crate::transport::bridge::PlatformBridge;
use crate::transport::native::NativeAgent;
use crate::transport::Scheme;
use std::sync::Arc;

/// Which transport family a context runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Socket transport with true streaming.
    Native,
    /// Host bridge with atomic delivery.
    Bridge,
}

/// Decides the transport family once and owns the two protocol agents.
///
/// The decision branches on environment capability: a platform bridge
/// handle supplied means the environment has no socket access and
/// every call goes through the bridge. There is no runtime
/// re-selection, and selection itself cannot fail.
pub struct TransportSelector {
    mode: TransportMode,
    http: Agent,
    https: Agent,
}

impl TransportSelector {
    pub fn select(bridge: Option<Arc<dyn PlatformBridge>>) -> Self {
        let params = AgentConfig::default();
        match bridge {
            Some(bridge) => {
                tracing::debug!("platform bridge supplied, selecting bridge transport");
                Self {
                    mode: TransportMode::Bridge,
                    http: Agent::Bridge { params, bridge: Arc::clone(&bridge) },
                    https: Agent::Bridge { params, bridge },
                }
            }
            None => {
                tracing::debug!("selecting socket transport");
                Self {
                    mode: TransportMode::Native,
                    http: Agent::Native(Arc::new(NativeAgent::new(Scheme::Http, params))),
                    https: Agent::Native(Arc::new(NativeAgent::new(Scheme::Https, params))),
                }
            }
        }
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// The agent serving a scheme. Scheme validation happened at URL
    /// parse time, so this is a plain lookup.
    pub fn agent_for(&self, scheme: Scheme) -> &Agent {
        match scheme {
            Scheme::Http => &self.http,
            Scheme::Https => &self.https,
        }
    }
}
