//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::{DEFAULT_MAX_FRAME_SIZE, DEFAULT_PORT};

/// Default target frame rate
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Default cursor step for rewind/fast-forward commands
pub const DEFAULT_SEEK_STEP: u64 = 10;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Target broadcast rate in frames per second
    pub frame_rate: u32,

    /// Cursor step applied by rewind/fast-forward commands
    pub seek_step: u64,

    /// Maximum concurrent consumers (0 = unlimited)
    pub max_connections: usize,

    /// Maximum frame payload size accepted onto the wire
    pub max_frame_size: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            frame_rate: DEFAULT_FRAME_RATE,
            seek_step: DEFAULT_SEEK_STEP,
            max_connections: 0, // Unlimited
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            tcp_nodelay: true, // Keeps per-frame latency low
        }
    }
}

impl ServerConfig {
    /// Create a new config with a custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the target frame rate (clamped to at least 1)
    pub fn frame_rate(mut self, rate: u32) -> Self {
        self.frame_rate = rate.max(1);
        self
    }

    /// Set the rewind/fast-forward cursor step
    pub fn seek_step(mut self, step: u64) -> Self {
        self.seek_step = step;
        self
    }

    /// Set maximum concurrent consumers
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Time between successive frames at the configured rate
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(config.seek_step, DEFAULT_SEEK_STEP);
        assert_eq!(config.max_connections, 0);
        assert!(config.tcp_nodelay);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:8001".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.frame_rate, DEFAULT_FRAME_RATE);
    }

    #[test]
    fn test_frame_period() {
        let config = ServerConfig::default().frame_rate(10);
        assert_eq!(config.frame_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_frame_rate_clamped_above_zero() {
        let config = ServerConfig::default().frame_rate(0);
        assert_eq!(config.frame_rate, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:9001".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .frame_rate(24)
            .seek_step(5)
            .max_connections(8);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.frame_rate, 24);
        assert_eq!(config.seek_step, 5);
        assert_eq!(config.max_connections, 8);
    }
}
