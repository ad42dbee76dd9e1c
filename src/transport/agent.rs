//! Per-scheme transport agents.

use crate::transport::bridge::PlatformBridge;
use crate::transport::native::NativeAgent;
use std::sync::Arc;

/// Upper bound on parked keep-alive connections per scheme.
pub const MAX_FREE_SOCKETS: usize = 8;

/// Connection-reuse parameters for one protocol agent.
///
/// On the bridge transport this is a plain record, accepted but
/// operationally inert: the host bridge manages its own connection
/// reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    pub keep_alive: bool,
    pub max_free_sockets: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { keep_alive: true, max_free_sockets: MAX_FREE_SOCKETS }
    }
}

/// One protocol agent: socket-backed or bridge-backed.
///
/// Exactly two agents live per context, one per scheme, built once by
/// the [`TransportSelector`](crate::transport::selector::TransportSelector).
#[derive(Clone)]
pub enum Agent {
    /// Socket transport with keep-alive and a bounded idle pool.
    Native(Arc<NativeAgent>),
    /// Bridge transport; `params` is carried for symmetry only.
    Bridge {
        params: AgentConfig,
        bridge: Arc<dyn PlatformBridge>,
    },
}

impl Agent {
    pub fn config(&self) -> AgentConfig {
        match self {
            Agent::Native(agent) => agent.config(),
            Agent::Bridge { params, .. } => *params,
        }
    }
}
