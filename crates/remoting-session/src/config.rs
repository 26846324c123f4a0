use remoting_frame::FrameConfig;
use remoting_transport::TcpOptions;
use serde::{Deserialize, Serialize};

/// Default capacity of each session queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Configuration applied when a session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the inbound and outbound queues. Bounds memory and sets
    /// the backpressure threshold for `submit`.
    pub queue_capacity: usize,
    /// Frame accumulation settings for the inbound direction.
    pub frame: FrameConfig,
    /// Socket options applied by [`crate::Session::from_tcp`].
    pub tcp: TcpOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            frame: FrameConfig::default(),
            tcp: TcpOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Override the queue capacity. Zero is treated as one.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Override frame accumulation settings.
    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    /// Override the maximum inbound frame length.
    pub fn with_max_frame_len(mut self, max: Option<usize>) -> Self {
        self.frame.max_frame_len = max;
        self
    }

    /// Override socket options.
    pub fn with_tcp_options(mut self, tcp: TcpOptions) -> Self {
        self.tcp = tcp;
        self
    }

    pub(crate) fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}
