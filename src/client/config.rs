//! Client configuration

use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::{DEFAULT_MAX_FRAME_SIZE, DEFAULT_PORT};

/// Default bounded-buffer capacity in frames
pub const DEFAULT_BUFFER_CAPACITY: usize = 300;

/// Default display resize factor applied at decode time
pub const DEFAULT_RESIZE_FACTOR: f32 = 0.2;

/// Default render rate in frames per second
pub const DEFAULT_RENDER_RATE: u32 = 30;

/// Default bounded-wait tick for idle playback states
pub const DEFAULT_IDLE_TICK: Duration = Duration::from_millis(50);

/// Client configuration options
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address to connect to
    pub server_addr: SocketAddr,

    /// Frame buffer capacity (oldest frames are evicted beyond this)
    pub buffer_capacity: usize,

    /// Resize factor applied to decoded frames before display
    pub resize_factor: f32,

    /// Render rate in frames per second
    pub render_rate: u32,

    /// Maximum frame payload size accepted from the wire
    pub max_frame_size: usize,

    /// Bounded-wait tick used whenever playback has nothing to do
    ///
    /// The playback engine never waits on a condition without this timeout,
    /// so it stays responsive to mode changes.
    pub idle_tick: Duration,

    /// External analysis command (program followed by arguments)
    ///
    /// Spawned fire-and-forget by the `analyze` input token; `None` disables
    /// the integration.
    pub analysis_command: Option<Vec<String>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            resize_factor: DEFAULT_RESIZE_FACTOR,
            render_rate: DEFAULT_RENDER_RATE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            idle_tick: DEFAULT_IDLE_TICK,
            analysis_command: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config with a custom server address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            server_addr: addr,
            ..Default::default()
        }
    }

    /// Set the server address
    pub fn server(mut self, addr: SocketAddr) -> Self {
        self.server_addr = addr;
        self
    }

    /// Set the frame buffer capacity (clamped to at least 1)
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Set the display resize factor
    pub fn resize_factor(mut self, factor: f32) -> Self {
        self.resize_factor = factor;
        self
    }

    /// Set the render rate (clamped to at least 1)
    pub fn render_rate(mut self, rate: u32) -> Self {
        self.render_rate = rate.max(1);
        self
    }

    /// Set the external analysis command
    pub fn analysis_command(mut self, command: Vec<String>) -> Self {
        self.analysis_command = Some(command);
        self
    }

    /// Time between successive rendered frames at the configured rate
    pub fn render_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.render_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();

        assert_eq!(config.server_addr.port(), DEFAULT_PORT);
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(config.resize_factor, DEFAULT_RESIZE_FACTOR);
        assert_eq!(config.render_rate, DEFAULT_RENDER_RATE);
        assert!(config.analysis_command.is_none());
    }

    #[test]
    fn test_buffer_capacity_clamped() {
        let config = ClientConfig::default().buffer_capacity(0);
        assert_eq!(config.buffer_capacity, 1);
    }

    #[test]
    fn test_render_period() {
        let config = ClientConfig::default().render_rate(10);
        assert_eq!(config.render_period(), Duration::from_millis(100));
    }
}
