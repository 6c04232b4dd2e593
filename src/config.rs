use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for a store to start responding. Zero disables the
/// deadline entirely.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::ZERO;

/// Default capacity of the per-store hand-off channel between a fan-out
/// task and the merge loop.
pub const DEFAULT_STREAM_BUFFER_SIZE: usize = 16;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// How long a store may take to begin responding to a series request
    /// before it is excluded from the merge. Zero means unbounded.
    pub response_timeout: Duration,

    /// Capacity of the bounded queue each store task fills while the merge
    /// loop consumes. Bounds memory by active stores, not result size.
    pub stream_buffer_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            stream_buffer_size: DEFAULT_STREAM_BUFFER_SIZE,
        }
    }
}

impl Settings {
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}
