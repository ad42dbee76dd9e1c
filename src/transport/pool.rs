//! Idle connection pool for the socket transport.
//!
//! Keep-alive connections are parked here between requests, keyed by
//! (host, port) and bounded per agent by
//! [`AgentConfig::max_free_sockets`](crate::transport::agent::AgentConfig).
//! Closed or stale entries are discarded at checkout; there is no
//! background reaper.

use bytes::Bytes;
use dashmap::DashMap;
use http_body_util::Full;
use hyper::client::conn::http1::SendRequest;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Parked HTTP/1.1 request sender, the unit of reuse.
pub type PooledSender = SendRequest<Full<Bytes>>;

/// How long a parked connection stays eligible for reuse.
const IDLE_PARK_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    host: String,
    port: u16,
}

struct IdleConn {
    sender: PooledSender,
    parked_at: Instant,
}

/// Bounded pool of idle keep-alive connections.
pub struct ConnectionPool {
    max_free: usize,
    groups: DashMap<GroupKey, VecDeque<IdleConn>>,
}

impl ConnectionPool {
    pub fn new(max_free: usize) -> Self {
        Self { max_free, groups: DashMap::new() }
    }

    /// Take a live parked connection for the target, if any.
    pub fn checkout(&self, host: &str, port: u16) -> Option<PooledSender> {
        let key = GroupKey { host: host.to_string(), port };
        let mut group = self.groups.get_mut(&key)?;
        while let Some(idle) = group.pop_front() {
            if idle.sender.is_closed() || idle.parked_at.elapsed() >= IDLE_PARK_TIMEOUT {
                continue;
            }
            return Some(idle.sender);
        }
        None
    }

    /// Park a connection for reuse; the oldest entries are dropped once
    /// the free bound is exceeded.
    pub fn checkin(&self, host: &str, port: u16, sender: PooledSender) {
        if sender.is_closed() {
            return;
        }
        let key = GroupKey { host: host.to_string(), port };
        let mut group = self.groups.entry(key).or_default();
        group.push_back(IdleConn { sender, parked_at: Instant::now() });
        while group.len() > self.max_free {
            group.pop_front();
        }
    }

    /// Total parked connections across all targets.
    pub fn idle_count(&self) -> usize {
        self.groups.iter().map(|group| group.len()).sum()
    }
}
