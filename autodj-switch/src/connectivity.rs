//! Network link monitoring
//!
//! The switch has no say over the network itself; it only needs to know
//! whether the flowsheet service is reachable. A [`LinkProbe`] answers that
//! question and [`ConnectivityMonitor`] decides how often to ask it.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, warn};

pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 30_000;

/// Something that can tell whether the link is up
pub trait LinkProbe {
    fn check(&self) -> bool;
}

/// Considers the link up when a TCP connection to `host:port` succeeds
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl LinkProbe for TcpProbe {
    fn check(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(probe = %self.target(), "Name resolution failed: {}", e);
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => return true,
                Err(e) => debug!(%addr, "Connect failed: {}", e),
            }
        }
        false
    }
}

/// Cached link state, refreshed on a schedule
///
/// While the link is down the probe runs every `retry_interval_ms`; while it
/// is up, every `check_interval_ms`.
#[derive(Debug)]
pub struct ConnectivityMonitor<P: LinkProbe> {
    probe: P,
    connected: bool,
    last_check_ms: u64,
    retry_interval_ms: u64,
    check_interval_ms: u64,
}

impl<P: LinkProbe> ConnectivityMonitor<P> {
    pub fn new(probe: P) -> Self {
        Self::with_intervals(probe, DEFAULT_RETRY_INTERVAL_MS, DEFAULT_CHECK_INTERVAL_MS)
    }

    pub fn with_intervals(probe: P, retry_interval_ms: u64, check_interval_ms: u64) -> Self {
        Self {
            probe,
            connected: false,
            last_check_ms: 0,
            retry_interval_ms,
            check_interval_ms,
        }
    }

    /// Initial check at startup
    pub fn set_up(&mut self, now_ms: u64) {
        self.connected = self.probe.check();
        self.last_check_ms = now_ms;
        if self.connected {
            info!("Link up.");
        } else {
            warn!("Link down at startup; will retry every {} ms", self.retry_interval_ms);
        }
    }

    /// Re-probe if the current interval has elapsed
    pub fn update(&mut self, now_ms: u64) {
        let interval = if self.connected {
            self.check_interval_ms
        } else {
            self.retry_interval_ms
        };
        if now_ms.wrapping_sub(self.last_check_ms) < interval {
            return;
        }
        self.last_check_ms = now_ms;

        let connected = self.probe.check();
        match (self.connected, connected) {
            (true, false) => warn!("Connection lost."),
            (false, true) => info!("Link reconnected."),
            (false, false) => debug!("Link still down."),
            (true, true) => {}
        }
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
